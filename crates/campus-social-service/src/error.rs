//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use campus_social_core::AccountId;
use campus_social_graph::GraphError;
use campus_social_store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden - valid credentials but not allowed to touch this resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - resource already exists or invalid state transition.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The requested username belongs to another account.
    #[error("username taken: {0}")]
    UsernameTaken(String),

    /// The conversation is being deleted.
    #[error("conversation is being deleted: {0}")]
    ConversationDeleting(String),

    /// A follow edge was written on one side only.
    #[error("follow edge left asymmetric: {actor} -> {target}")]
    AsymmetricEdge {
        /// Account that issued the request.
        actor: AccountId,
        /// Account being (un)followed.
        target: AccountId,
        /// Whether the request was a follow.
        follow: bool,
    },

    /// The store is temporarily unreachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// External service error.
    #[error("external service error: {0}")]
    ExternalService(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone(), None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            Self::UsernameTaken(username) => (
                StatusCode::CONFLICT,
                "username_taken",
                format!("Username {username} is already taken"),
                Some(serde_json::json!({ "username": username })),
            ),
            Self::ConversationDeleting(id) => (
                StatusCode::CONFLICT,
                "conversation_deleting",
                format!("Conversation {id} is being deleted"),
                Some(serde_json::json!({ "conversation_id": id })),
            ),
            Self::AsymmetricEdge {
                actor,
                target,
                follow,
            } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "asymmetric_edge",
                "Follow was only partially applied, retry the same request".to_string(),
                Some(serde_json::json!({
                    "actor_id": actor,
                    "target_id": target,
                    "follow": follow,
                    "retry": true
                })),
            ),
            Self::Unavailable(msg) => {
                tracing::warn!(error = %msg, "Storage unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "unavailable",
                    "Storage is temporarily unavailable".to_string(),
                    None,
                )
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            Self::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                "external_service_error",
                msg.clone(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { path } => Self::NotFound(format!("record not found: {path}")),
            StoreError::Unavailable(msg) => Self::Unavailable(msg),
            StoreError::InvalidPath(msg) => Self::BadRequest(msg),
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UsernameTaken { username } => Self::UsernameTaken(username),
            e @ (GraphError::UsernameExhausted { .. }
            | GraphError::AccountAlreadyExists { .. }) => Self::Conflict(e.to_string()),
            e @ (GraphError::AccountNotFound { .. }
            | GraphError::ConversationNotFound { .. }
            | GraphError::NotificationNotFound { .. }) => Self::NotFound(e.to_string()),
            GraphError::AsymmetricEdge {
                actor,
                target,
                follow,
                ..
            } => Self::AsymmetricEdge {
                actor,
                target,
                follow,
            },
            GraphError::ConversationDeleting { conversation_id } => {
                Self::ConversationDeleting(conversation_id)
            }
            e @ GraphError::NotParticipant { .. } => Self::Forbidden(e.to_string()),
            e @ (GraphError::InvalidUsername(_)
            | GraphError::SelfConversation
            | GraphError::EmptyMessage) => {
                Self::BadRequest(e.to_string())
            }
            GraphError::Store(e) => e.into(),
        }
    }
}
