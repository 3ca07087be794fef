//! Notification handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use campus_social_core::{Notification, NotificationId, NotificationType};

use super::{default_page_size, parse_id, MAX_PAGE_SIZE};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Notification list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    /// Maximum number of notifications to return (default: 50).
    #[serde(default = "default_page_size")]
    pub limit: usize,
    /// Only return unread notifications.
    #[serde(default)]
    pub unread_only: bool,
}

/// Notification response.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    /// Notification ID.
    pub id: String,
    /// Kind of action.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Account that acted.
    pub sender_id: String,
    /// Sender's display name at the time of the action.
    pub sender_name: String,
    /// Sender's username at the time of the action.
    pub sender_username: String,
    /// Sender's avatar at the time of the action.
    pub sender_avatar_url: Option<String>,
    /// Text shown to the user.
    pub message: String,
    /// Whether the owner has seen it.
    pub read: bool,
    /// Related object (conversation, post, ...).
    pub related_id: Option<String>,
    /// Timestamp.
    pub created_at: String,
}

impl From<&Notification> for NotificationResponse {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            notification_type: n.notification_type,
            sender_id: n.sender_id.to_string(),
            sender_name: n.sender.display_name.clone(),
            sender_username: n.sender.username.clone(),
            sender_avatar_url: n.sender.avatar_url.clone(),
            message: n.message.clone(),
            read: n.read,
            related_id: n.related_id.clone(),
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Notification list response.
#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    /// Notifications, newest first.
    pub notifications: Vec<NotificationResponse>,
    /// Number returned.
    pub count: usize,
}

/// List the caller's notifications.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
    let notifications = state
        .graph
        .notifications
        .list(auth.account_id, limit, query.unread_only)
        .await?;

    let notifications: Vec<_> = notifications.iter().map(NotificationResponse::from).collect();
    Ok(Json(NotificationListResponse {
        count: notifications.len(),
        notifications,
    }))
}

/// Mark one notification as read.
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: NotificationId = parse_id(&id, "notification")?;
    state
        .graph
        .notifications
        .mark_read(auth.account_id, id)
        .await?;

    Ok(Json(serde_json::json!({ "id": id.to_string(), "read": true })))
}

/// Mark all of the caller's notifications as read.
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = state
        .graph
        .notifications
        .mark_all_read(auth.account_id)
        .await?;

    tracing::debug!(account_id = %auth.account_id, updated, "All notifications read");

    Ok(Json(serde_json::json!({ "updated": updated })))
}
