//! Client error types.

/// Errors that can occur when using the campus-social client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Missing or rejected credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The requested username belongs to another account.
    #[error("username taken: {username}")]
    UsernameTaken {
        /// The username.
        username: String,
    },

    /// A follow was only half applied; repeat the same call.
    #[error("follow edge left asymmetric, retry")]
    AsymmetricEdge,

    /// The conversation is being deleted.
    #[error("conversation is being deleted: {conversation_id}")]
    ConversationDeleting {
        /// The conversation ID.
        conversation_id: String,
    },

    /// The resource does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Server message.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::AsymmetricEdge => true,
            Self::Api { status, .. } => *status == 503,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
