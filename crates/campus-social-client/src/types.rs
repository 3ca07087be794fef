//! Request and response types for the campus-social client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    /// Contact email; seeds the username when none is requested.
    pub email: String,
    /// Requested username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// First name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Short bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl RegisterRequest {
    /// A request with only an email; the server derives the username.
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }
}

/// Account as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: String,
    /// Unique handle.
    pub username: String,
    /// Name shown to other users.
    pub display_name: String,
    /// Contact email (own account only).
    #[serde(default)]
    pub email: Option<String>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Short bio.
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Number of followers.
    pub follower_count: usize,
    /// Number of accounts followed.
    pub following_count: usize,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

/// Username availability.
#[derive(Debug, Clone, Deserialize)]
pub struct UsernameAvailability {
    /// Normalised username.
    pub username: String,
    /// Whether it is free right now.
    pub available: bool,
}

/// What a follow or unfollow did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    /// The edge now exists.
    Followed,
    /// The edge no longer exists.
    Unfollowed,
    /// Nothing was written (self-follow).
    Unchanged,
}

/// Follow / unfollow response.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowResponse {
    /// Target account.
    pub target_id: String,
    /// What happened.
    pub outcome: FollowOutcome,
}

/// Follower or following list.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowListResponse {
    /// Account whose list this is.
    pub account_id: String,
    /// Account ids.
    pub accounts: Vec<String>,
    /// Number of entries.
    pub count: usize,
}

/// Notification as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationResponse {
    /// Notification ID.
    pub id: String,
    /// Kind of action (`new_follower`, `message`, ...).
    #[serde(rename = "type")]
    pub notification_type: String,
    /// Account that acted.
    pub sender_id: String,
    /// Sender's display name.
    pub sender_name: String,
    /// Sender's username.
    pub sender_username: String,
    /// Sender's avatar.
    #[serde(default)]
    pub sender_avatar_url: Option<String>,
    /// Text.
    pub message: String,
    /// Whether it has been read.
    pub read: bool,
    /// Related object.
    #[serde(default)]
    pub related_id: Option<String>,
    /// Timestamp.
    pub created_at: DateTime<Utc>,
}

/// Notification list.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationListResponse {
    /// Notifications, newest first.
    pub notifications: Vec<NotificationResponse>,
    /// Number returned.
    pub count: usize,
}

/// Result of marking everything read.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkAllReadResponse {
    /// Number of notifications changed.
    pub updated: usize,
}

/// Conversation as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationResponse {
    /// Conversation ID.
    pub id: String,
    /// Both participants.
    pub participant_ids: Vec<String>,
    /// Latest message preview.
    #[serde(default)]
    pub last_message: Option<String>,
    /// Latest message time.
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

/// Message as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    /// Message ID.
    pub id: String,
    /// Author.
    pub sender_id: String,
    /// Text.
    pub body: String,
    /// Timestamp.
    pub created_at: DateTime<Utc>,
}

/// Message list.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageListResponse {
    /// Messages, oldest first.
    pub messages: Vec<MessageResponse>,
    /// Number returned.
    pub count: usize,
}

/// Result of a conversation delete.
///
/// `success == false` means the delete stopped partway; call again.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteConversationResponse {
    /// Whether the conversation is fully gone.
    pub success: bool,
    /// Explanation.
    pub message: String,
    /// Records removed by this call.
    pub deleted: usize,
}

/// Health check response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}

/// Error response from API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// Error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Additional details.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenConversationRequest<'a> {
    pub participant_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub body: &'a str,
}
