//! Signal CLI REST API client.

mod client;
mod error;
mod receiver;
mod types;

pub use client::SignalClient;
pub use error::SignalError;
pub use receiver::MessageReceiver;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BOT_NUMBER: &str = "+15555555555";

    fn create_test_client(mock_server: &MockServer) -> SignalClient {
        SignalClient::new(mock_server.uri(), BOT_NUMBER).unwrap()
    }

    fn incoming(source: &str, text: Option<&str>, group: Option<&str>) -> IncomingMessage {
        IncomingMessage {
            envelope: Envelope {
                source: source.into(),
                source_number: Some(source.into()),
                source_name: Some("Test User".into()),
                timestamp: 1677652288000,
                data_message: Some(DataMessage {
                    message: text.map(String::from),
                    timestamp: 1677652288000,
                    group_info: group.map(|g| GroupInfo { group_id: g.into() }),
                }),
            },
            account: BOT_NUMBER.into(),
        }
    }

    #[tokio::test]
    async fn test_health_check_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        assert!(!client.health_check().await);
    }

    #[tokio::test]
    async fn test_receive_messages() {
        let mock_server = MockServer::start().await;

        let messages = serde_json::json!([
            {
                "envelope": {
                    "source": "+14155551234",
                    "sourceNumber": "+14155551234",
                    "sourceName": "Test User",
                    "timestamp": 1677652288000i64,
                    "dataMessage": {
                        "message": "!bot roll",
                        "timestamp": 1677652288000i64,
                        "groupInfo": null
                    }
                },
                "account": "+15555555555"
            }
        ]);

        // + is URL-encoded as %2B
        Mock::given(method("GET"))
            .and(path("/v1/receive/%2B15555555555"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&messages))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let msgs = client.receive().await.unwrap();

        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].envelope.source, "+14155551234");
    }

    #[tokio::test]
    async fn test_receive_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/receive/%2B15555555555"))
            .respond_with(ResponseTemplate::new(400).set_body_string("not registered"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.receive().await;

        assert!(matches!(result, Err(SignalError::Api(msg)) if msg == "not registered"));
    }

    #[tokio::test]
    async fn test_send_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .and(body_json(serde_json::json!({
                "message": "Hello!",
                "number": "+15555555555",
                "recipients": ["+14155551234"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "timestamp": "1677652288000"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.send("+14155551234", "Hello!").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_message_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid recipient"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.send("+14155551234", "Hello!").await;

        assert!(matches!(result, Err(SignalError::SendFailed(_))));
    }

    #[tokio::test]
    async fn test_send_read_receipt() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/receipts/%2B15555555555"))
            .and(body_json(serde_json::json!({
                "receipt_type": "read",
                "recipient": "+14155551234",
                "timestamp": 1677652288000i64
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let msg = RoomMessage::from_incoming(
            &incoming("+14155551234", Some("!bot help"), None),
            BOT_NUMBER,
        )
        .unwrap();

        assert!(client.send_read_receipt(&msg).await.is_ok());
    }

    #[test]
    fn test_room_message_from_direct() {
        let msg = RoomMessage::from_incoming(
            &incoming("+14155551234", Some("Hello bot!"), None),
            BOT_NUMBER,
        )
        .unwrap();

        assert_eq!(msg.room_id, "+14155551234");
        assert_eq!(msg.sender_id, "+14155551234");
        assert_eq!(msg.sender_name.as_deref(), Some("Test User"));
        assert_eq!(msg.body, "Hello bot!");
        assert!(!msg.is_group);
        assert!(!msg.is_own);
    }

    #[test]
    fn test_room_message_from_group() {
        let msg = RoomMessage::from_incoming(
            &incoming("+14155551234", Some("Hello group!"), Some("test-group-id")),
            BOT_NUMBER,
        )
        .unwrap();

        assert!(msg.is_group);
        assert_eq!(msg.room_id, "test-group-id");
        assert_eq!(msg.sender_id, "+14155551234");
    }

    #[test]
    fn test_room_message_own() {
        let msg = RoomMessage::from_incoming(
            &incoming(BOT_NUMBER, Some("Trivia Game concluded."), Some("g1")),
            BOT_NUMBER,
        )
        .unwrap();

        assert!(msg.is_own);
    }

    #[test]
    fn test_room_message_without_text() {
        assert!(RoomMessage::from_incoming(&incoming("+14155551234", None, None), BOT_NUMBER)
            .is_none());

        let mut receipt = incoming("+14155551234", None, None);
        receipt.envelope.data_message = None;
        assert!(RoomMessage::from_incoming(&receipt, BOT_NUMBER).is_none());
    }

    #[test]
    fn test_blank_source_name_dropped() {
        let mut msg = incoming("+14155551234", Some("hi"), None);
        msg.envelope.source_name = Some("  ".into());

        let room_msg = RoomMessage::from_incoming(&msg, BOT_NUMBER).unwrap();
        assert!(room_msg.sender_name.is_none());
    }
}
