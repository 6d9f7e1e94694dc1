//! Wire types for the discussion service JSON API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Kind of message, as reported by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Poll,
    #[serde(other)]
    Other,
}

impl Default for MessageKind {
    fn default() -> Self {
        MessageKind::Text
    }
}

/// A task referenced from a message (shown inline under the text).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskRef {
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Aggregated reactions for one emoji on a message.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReactionSummary {
    pub count: u32,
    #[serde(default)]
    pub users: Vec<i64>,
    #[serde(default)]
    pub user_reacted: bool,
}

/// One option of a poll attached to a message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollOptionView {
    pub id: i64,
    pub text: String,
    pub votes: u32,
    #[serde(default)]
    pub pct: u32,
    #[serde(default)]
    pub user_voted: bool,
}

/// A poll attached to a message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollView {
    pub id: i64,
    pub question: String,
    pub is_active: bool,
    #[serde(default)]
    pub options: Vec<PollOptionView>,
    #[serde(default)]
    pub total_votes: u32,
}

/// A single discussion message.
///
/// Ids are unique and strictly increasing across a channel's stream; the
/// poller relies on that ordering for its watermark filter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(default)]
    pub message_type: MessageKind,
    pub author_name: String,
    #[serde(default)]
    pub author_role: String,
    #[serde(default)]
    pub author_avatar_color: String,
    /// Pre-formatted clock time, e.g. "03:41 PM".
    pub created_at: String,
    #[serde(default)]
    pub is_own: bool,
    #[serde(default)]
    pub referenced_task: Option<TaskRef>,
    #[serde(default)]
    pub reactions: HashMap<String, ReactionSummary>,
    #[serde(default)]
    pub poll: Option<PollView>,
}

/// A channel visible to the current user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub channel_type: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_member: bool,
    /// For DM channels, the counterpart's display name.
    #[serde(default)]
    pub other_user_name: Option<String>,
    #[serde(default)]
    pub other_user_avatar_color: Option<String>,
}

impl Channel {
    /// Display label: DM channels are labelled by the other user.
    pub fn label(&self) -> &str {
        if self.channel_type == "dm" {
            if let Some(ref other) = self.other_user_name {
                return other;
            }
        }
        &self.name
    }
}

/// Server acknowledgement for a sent message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SendReceipt {
    pub id: i64,
    pub content: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_deserializes_full_payload() {
        let raw = r##"{
            "id": 42,
            "user_id": 7,
            "content": "Poll time @all",
            "message_type": "poll",
            "author_name": "Asha",
            "author_role": "coordinator",
            "author_avatar_color": "#6C63FF",
            "created_at": "03:41 PM",
            "is_own": false,
            "referenced_task": {"title": "Ship flyer", "status": "review", "due_date": "Mar 02"},
            "reactions": {"🔥": {"count": 2, "users": [3, 9], "user_reacted": true}},
            "poll": {
                "id": 5,
                "question": "Meet when?",
                "is_active": true,
                "options": [{"id": 1, "text": "Friday", "votes": 3, "pct": 75, "user_voted": false}],
                "total_votes": 4
            }
        }"##;

        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.id, 42);
        assert_eq!(msg.message_type, MessageKind::Poll);
        assert_eq!(msg.referenced_task.as_ref().unwrap().status, "review");
        assert_eq!(msg.reactions["🔥"].count, 2);
        assert_eq!(msg.poll.as_ref().unwrap().options.len(), 1);
    }

    #[test]
    fn test_message_deserializes_minimal_payload() {
        // Sparse payloads (e.g. from older servers) still parse
        let raw = r#"{
            "id": 1,
            "user_id": 2,
            "content": "hi",
            "author_name": "Tev",
            "created_at": "09:00 AM"
        }"#;

        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.message_type, MessageKind::Text);
        assert!(msg.reactions.is_empty());
        assert!(msg.poll.is_none());
    }

    #[test]
    fn test_unknown_message_type_maps_to_other() {
        let raw = r#"{
            "id": 1,
            "user_id": 2,
            "content": "x",
            "message_type": "sticker",
            "author_name": "Tev",
            "created_at": "09:00 AM"
        }"#;

        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.message_type, MessageKind::Other);
    }

    #[test]
    fn test_channel_label_prefers_dm_counterpart() {
        let dm = Channel {
            id: 3,
            name: "dm-3".into(),
            channel_type: "dm".into(),
            is_private: true,
            is_member: true,
            other_user_name: Some("Rin".into()),
            other_user_avatar_color: None,
        };
        assert_eq!(dm.label(), "Rin");

        let group = Channel {
            id: 4,
            name: "general".into(),
            channel_type: "group".into(),
            is_private: false,
            is_member: true,
            other_user_name: None,
            other_user_avatar_color: None,
        };
        assert_eq!(group.label(), "general");
    }
}
