//! Notification types.
//!
//! Notifications are append-only records owned by the account they notify.
//! They carry a copy of the sender's display fields taken when the
//! notification was written; later profile edits are not reflected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Account, AccountId, NotificationId};

/// Record field holding the read flag.
pub const READ_FIELD: &str = "read";

/// Record field holding the creation time.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// What kind of action produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Someone started following the owner.
    NewFollower,
    /// Someone liked one of the owner's posts.
    Like,
    /// Someone commented on one of the owner's posts.
    Comment,
    /// Someone sent the owner a direct message.
    Message,
    /// Someone booked a seat in the owner's carpool.
    CarpoolBooking,
    /// Someone is attending the owner's event.
    EventAttendance,
}

/// The sender's display fields at the time of emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderSnapshot {
    /// Display name.
    pub display_name: String,

    /// Username.
    pub username: String,

    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<&Account> for SenderSnapshot {
    fn from(account: &Account) -> Self {
        Self {
            display_name: account.display_name(),
            username: account.username.to_string(),
            avatar_url: account.profile.avatar_url.clone(),
        }
    }
}

/// A notification delivered to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification ID.
    pub id: NotificationId,

    /// The account this notification belongs to.
    pub owner_id: AccountId,

    /// What happened.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,

    /// The account that caused it.
    pub sender_id: AccountId,

    /// Sender display fields, frozen at creation.
    pub sender: SenderSnapshot,

    /// Human-readable message.
    pub message: String,

    /// Whether the owner has read it. The only field that changes after creation.
    #[serde(default)]
    pub read: bool,

    /// When it was created.
    pub created_at: DateTime<Utc>,

    /// ID of the related object (post, conversation, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
}

impl Notification {
    /// Create a new unread notification.
    #[must_use]
    pub fn new(
        owner_id: AccountId,
        sender_id: AccountId,
        sender: SenderSnapshot,
        notification_type: NotificationType,
        message: String,
        related_id: Option<String>,
    ) -> Self {
        Self {
            id: NotificationId::generate(),
            owner_id,
            notification_type,
            sender_id,
            sender,
            message,
            read: false,
            created_at: Utc::now(),
            related_id,
        }
    }
}
