//! Conversation aggregate types.
//!
//! A conversation root and its messages are one unit: deleting the root
//! deletes every message under it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, ConversationId, MessageId};

/// Record field holding the deletion flag.
pub const DELETING_FIELD: &str = "deleting";

/// Longest message preview kept on the conversation root, in characters.
pub const PREVIEW_MAX_CHARS: usize = 120;

/// A direct conversation between two accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Conversation ID (derived from the participants).
    pub id: ConversationId,

    /// Both participants, lower identifier first.
    pub participant_ids: [AccountId; 2],

    /// Preview of the latest message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,

    /// Time of the latest message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<DateTime<Utc>>,

    /// Set once deletion has started. A conversation in this state accepts no
    /// new messages and cannot be reopened until deletion completes.
    #[serde(default)]
    pub deleting: bool,

    /// When the conversation was created.
    pub created_at: DateTime<Utc>,

    /// When the conversation was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation.
    #[must_use]
    pub fn new(id: ConversationId) -> Self {
        let (low, high) = id.participants();
        let now = Utc::now();
        Self {
            id,
            participant_ids: [low, high],
            last_message: None,
            last_message_at: None,
            deleting: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A message inside a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message ID (time-ordered).
    pub id: MessageId,

    /// Author.
    pub sender_id: AccountId,

    /// Message text.
    pub body: String,

    /// When it was sent.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with the current time.
    #[must_use]
    pub fn new(sender_id: AccountId, body: String) -> Self {
        Self {
            id: MessageId::generate(),
            sender_id,
            body,
            created_at: Utc::now(),
        }
    }

    /// Short preview for the conversation root.
    #[must_use]
    pub fn preview(&self) -> String {
        let mut chars = self.body.chars();
        let head: String = chars.by_ref().take(PREVIEW_MAX_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}…")
        } else {
            head
        }
    }
}
