//! Signal API types.

use serde::{Deserialize, Serialize};

/// Incoming Signal message.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub envelope: Envelope,
    pub account: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub source: String,
    #[serde(rename = "sourceNumber")]
    pub source_number: Option<String>,
    #[serde(rename = "sourceName")]
    pub source_name: Option<String>,
    pub timestamp: i64,
    #[serde(rename = "dataMessage")]
    pub data_message: Option<DataMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataMessage {
    pub message: Option<String>,
    pub timestamp: i64,
    #[serde(rename = "groupInfo")]
    pub group_info: Option<GroupInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupInfo {
    #[serde(rename = "groupId")]
    pub group_id: String,
}

/// Outgoing message request.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub message: String,
    pub number: String,
    pub recipients: Vec<String>,
}

/// Read receipt request.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptRequest {
    pub receipt_type: String,
    pub recipient: String,
    pub timestamp: i64,
}

/// A text message observed in a room, ready for the bot.
///
/// A room is a Signal group, or the direct conversation with one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMessage {
    /// Group ID for group messages, the sender's number otherwise.
    pub room_id: String,
    /// Sender identity (phone number or UUID).
    pub sender_id: String,
    /// Profile name carried on the envelope, if any.
    pub sender_name: Option<String>,
    /// The message text.
    pub body: String,
    /// Envelope timestamp, used for read receipts.
    pub timestamp: i64,
    pub is_group: bool,
    /// Whether the bot's own account sent this message.
    pub is_own: bool,
}

impl RoomMessage {
    /// Extract a room message from an incoming envelope.
    ///
    /// Returns `None` for envelopes without text (receipts, typing indicators).
    pub fn from_incoming(msg: &IncomingMessage, own_number: &str) -> Option<Self> {
        let data = msg.envelope.data_message.as_ref()?;
        let body = data.message.clone()?;
        let sender_id = msg.envelope.source.clone();
        let group_id = data.group_info.as_ref().map(|g| g.group_id.clone());

        let is_own = sender_id == own_number
            || msg.envelope.source_number.as_deref() == Some(own_number);

        Some(Self {
            room_id: group_id.clone().unwrap_or_else(|| sender_id.clone()),
            sender_name: msg
                .envelope
                .source_name
                .clone()
                .filter(|name| !name.trim().is_empty()),
            sender_id,
            body,
            timestamp: msg.envelope.timestamp,
            is_group: group_id.is_some(),
            is_own,
        })
    }
}
