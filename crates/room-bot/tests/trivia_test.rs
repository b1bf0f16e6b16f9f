//! Trivia games played through the bot with a stub question provider.

mod common;

use common::{context, message, question, settle, RecordingTransport, StubQuestions};
use room_bot::session::Bot;
use std::sync::Arc;
use std::time::Duration;
use trivia_client::LICENSE_NOTICE;

const ROOM: &str = "quiz-room";

fn questions() -> Vec<trivia_client::Question> {
    vec![
        question(
            "Who created Linux?",
            "Linus Torvalds",
            &["Bill Gates", "Steve Jobs", "Ada Lovelace"],
        ),
        question("Rust has a garbage collector.", "False", &["True"]),
    ]
}

#[tokio::test(start_paused = true)]
async fn test_single_round_game() {
    let transport = Arc::new(RecordingTransport::default());
    let mut bot = Bot::new(context(StubQuestions::new(questions())), transport.clone());

    bot.handle(&message(ROOM, "Alice", "!bot trivia timer 5 rounds 1")).await;
    settle().await;

    let sent = transport.sent_to(ROOM);
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0],
        format!(
            "Starting Trivia Game. {}.\n1 rounds, 5 seconds per round.",
            LICENSE_NOTICE
        )
    );
    assert!(sent[1].starts_with(
        "1/1 | Science: Computers : medium difficulty\nWho created Linux?\n  a. "
    ));
    assert_eq!(sent[1].matches("\n  ").count(), 4);

    bot.handle(&message(ROOM, "Alice", "Linus Torvalds")).await;
    bot.handle(&message(ROOM, "Bob", "Steve Jobs")).await;
    bot.handle(&message("other-room", "Carol", "linus torvalds")).await;

    // Round timer is five seconds plus the grace period.
    tokio::time::sleep(Duration::from_millis(5400)).await;
    settle().await;
    assert_eq!(transport.sent_to(ROOM).len(), 2);

    tokio::time::sleep(Duration::from_millis(200)).await;
    settle().await;

    let sent = transport.sent_to(ROOM);
    assert_eq!(sent.len(), 4);
    assert!(sent[2].starts_with("Round 1 ended. The correct answer was \""));
    assert!(sent[2].ends_with("Linus Torvalds. A point goes to Alice."));
    assert_eq!(sent[3], "Trivia Game concluded. Winner(s): Alice with 1 points.");

    bot.handle(&message(ROOM, "Alice", "!bot trivia stop")).await;
    settle().await;
    assert_eq!(
        transport.sent_to(ROOM).last().unwrap(),
        "There is no started trivia game to stop."
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_start_is_refused() {
    let transport = Arc::new(RecordingTransport::default());
    let mut bot = Bot::new(context(StubQuestions::new(questions())), transport.clone());

    bot.handle(&message(ROOM, "Alice", "!bot trivia")).await;
    settle().await;
    bot.handle(&message(ROOM, "Bob", "!bot trivia rounds 1")).await;
    settle().await;

    let sent = transport.sent_to(ROOM);
    assert!(sent[0].ends_with("2 rounds, 30 seconds per round."));
    assert_eq!(sent.last().unwrap(), "Trivia game is already in progress!");
}

#[tokio::test(start_paused = true)]
async fn test_stop_mid_round() {
    let transport = Arc::new(RecordingTransport::default());
    let mut bot = Bot::new(context(StubQuestions::new(questions())), transport.clone());

    bot.handle(&message(ROOM, "Alice", "!bot trivia timer 10")).await;
    settle().await;
    bot.handle(&message(ROOM, "Alice", "!bot trivia stop")).await;
    settle().await;

    assert_eq!(transport.sent_to(ROOM).last().unwrap(), "Trivia Game concluded.");
    transport.clear();

    // The armed round timer passes without effect.
    tokio::time::sleep(Duration::from_secs(60)).await;
    settle().await;
    assert!(transport.sent_to(ROOM).is_empty());

    bot.handle(&message(ROOM, "Alice", "!bot trivia rounds 1")).await;
    settle().await;
    assert!(transport.sent_to(ROOM)[0].starts_with("Starting Trivia Game."));
}

#[tokio::test(start_paused = true)]
async fn test_stop_while_fetching_discards_questions() {
    let transport = Arc::new(RecordingTransport::default());
    let provider = StubQuestions::slow(questions(), Duration::from_secs(3));
    let mut bot = Bot::new(context(provider), transport.clone());

    bot.handle(&message(ROOM, "Alice", "!bot trivia")).await;
    settle().await;
    assert!(transport.sent_to(ROOM).is_empty());

    bot.handle(&message(ROOM, "Alice", "!bot trivia stop")).await;
    settle().await;
    assert_eq!(transport.sent_to(ROOM), vec!["Trivia Game concluded."]);

    tokio::time::sleep(Duration::from_secs(60)).await;
    settle().await;
    assert_eq!(transport.sent_to(ROOM).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_games_in_different_rooms_are_independent() {
    let transport = Arc::new(RecordingTransport::default());
    let mut bot = Bot::new(context(StubQuestions::new(questions())), transport.clone());

    bot.handle(&message("room-a", "Alice", "!bot trivia rounds 1 timer 5")).await;
    bot.handle(&message("room-b", "Bob", "!bot trivia rounds 1 timer 20")).await;
    settle().await;

    tokio::time::sleep(Duration::from_secs(6)).await;
    settle().await;

    assert_eq!(
        transport.sent_to("room-a").last().unwrap(),
        "Trivia Game concluded."
    );
    assert_eq!(transport.sent_to("room-b").len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_answer_scored_while_another_room_awaits_receipt() {
    let transport = Arc::new(RecordingTransport::with_receipt_delay(Duration::from_secs(29)));
    let mut bot = Bot::new(
        context(StubQuestions::new(vec![question(
            "Rust has a borrow checker.",
            "True",
            &["False"],
        )])),
        transport.clone(),
    );

    bot.handle(&message("room-b", "Bob", "!bot trivia timer 5 rounds 1")).await;
    settle().await;
    assert_eq!(transport.sent_to("room-b").len(), 2);

    bot.handle(&message("room-a", "Alice", "!bot roll")).await;
    bot.handle(&message("room-b", "Bob", "True")).await;

    tokio::time::sleep(Duration::from_secs(6)).await;
    settle().await;

    let sent = transport.sent_to("room-b");
    assert_eq!(sent.len(), 4);
    assert!(sent[2].ends_with("True. A point goes to Bob."));
    assert_eq!(sent[3], "Trivia Game concluded. Winner(s): Bob with 1 points.");
    assert!(transport.sent_to("room-a")[0].starts_with("Your result: "));
}
