//! Conversation and message handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use campus_social_core::{AccountId, Conversation, ConversationId, Message};
use campus_social_graph::{DeleteOutcome, GraphError};

use super::{default_page_size, parse_id, MAX_PAGE_SIZE};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Conversation response.
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    /// Conversation ID.
    pub id: String,
    /// Both participants.
    pub participant_ids: Vec<String>,
    /// Preview of the latest message.
    pub last_message: Option<String>,
    /// When the latest message was sent.
    pub last_message_at: Option<String>,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&Conversation> for ConversationResponse {
    fn from(c: &Conversation) -> Self {
        Self {
            id: c.id.to_string(),
            participant_ids: c.participant_ids.iter().map(ToString::to_string).collect(),
            last_message: c.last_message.clone(),
            last_message_at: c.last_message_at.map(|at| at.to_rfc3339()),
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Message ID.
    pub id: String,
    /// Author.
    pub sender_id: String,
    /// Text.
    pub body: String,
    /// Timestamp.
    pub created_at: String,
}

impl From<&Message> for MessageResponse {
    fn from(m: &Message) -> Self {
        Self {
            id: m.id.to_string(),
            sender_id: m.sender_id.to_string(),
            body: m.body.clone(),
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Open conversation request.
#[derive(Debug, Deserialize)]
pub struct OpenConversationRequest {
    /// The other participant.
    pub participant_id: String,
}

/// Send message request.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Text.
    pub body: String,
}

/// Message list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    /// Maximum number of messages to return (default: 50).
    #[serde(default = "default_page_size")]
    pub limit: usize,
}

/// Message list response.
#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    /// Messages, oldest first.
    pub messages: Vec<MessageResponse>,
    /// Number returned.
    pub count: usize,
}

/// Parse a conversation id and check the caller takes part in it.
fn participant_conversation(raw: &str, auth: &AuthUser) -> Result<ConversationId, ApiError> {
    let id: ConversationId = parse_id(raw, "conversation")?;
    if !id.includes(auth.account_id) {
        return Err(GraphError::NotParticipant {
            account_id: auth.account_id,
            conversation_id: id.to_string(),
        }
        .into());
    }
    Ok(id)
}

/// Open (or return) the conversation between the caller and another account.
pub async fn open_conversation(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<OpenConversationRequest>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let other: AccountId = parse_id(&body.participant_id, "account")?;
    if other != auth.account_id {
        state.graph.identity.get_account(other).await?;
    }

    let conversation = state
        .graph
        .conversations
        .open(auth.account_id, other)
        .await?;

    Ok(Json(ConversationResponse::from(&conversation)))
}

/// Get a conversation.
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let id = participant_conversation(&id, &auth)?;
    let conversation = state.graph.conversations.get(&id).await?;
    Ok(Json(ConversationResponse::from(&conversation)))
}

/// Delete a conversation and all of its messages.
///
/// Always answers 200; a partial delete is reported with `success: false`
/// and the caller should repeat the request.
pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = participant_conversation(&id, &auth)?;
    let outcome = state.graph.destroyer.delete_conversation(&id).await;

    tracing::info!(
        account_id = %auth.account_id,
        conversation_id = %id,
        success = outcome.success,
        deleted = outcome.deleted,
        "Conversation delete requested"
    );

    Ok(Json(outcome))
}

/// List the latest messages of a conversation.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<MessageListResponse>, ApiError> {
    let id = participant_conversation(&id, &auth)?;
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);

    let messages = state.graph.conversations.list_messages(&id, limit).await?;
    let messages: Vec<_> = messages.iter().map(MessageResponse::from).collect();

    Ok(Json(MessageListResponse {
        count: messages.len(),
        messages,
    }))
}

/// Send a message.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = participant_conversation(&id, &auth)?;
    let message = state
        .graph
        .conversations
        .send_message(&id, auth.account_id, &body.body)
        .await?;

    Ok(Json(MessageResponse::from(&message)))
}
