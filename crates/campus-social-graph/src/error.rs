//! Error types for the social-graph operations.

use campus_social_core::{AccountId, UsernameError};
use campus_social_store::StoreError;

/// Result type for social-graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors returned by the social-graph operations.
///
/// Domain outcomes get their own variant. Store faults pass through
/// unchanged as `GraphError::Store`.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The explicitly requested username belongs to another account.
    #[error("username already taken: {username}")]
    UsernameTaken {
        /// The requested username.
        username: String,
    },

    /// The requested username breaks the username rules.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Every derived candidate up to the probe limit is in use.
    #[error("no free username derived from {base:?} within {probes} candidates")]
    UsernameExhausted {
        /// The derived base.
        base: String,
        /// How many candidates were tried.
        probes: u32,
    },

    /// An account with this ID is already registered.
    #[error("account already exists: {account_id}")]
    AccountAlreadyExists {
        /// The account ID.
        account_id: AccountId,
    },

    /// No account with this ID.
    #[error("account not found: {account_id}")]
    AccountNotFound {
        /// The account ID.
        account_id: AccountId,
    },

    /// The actor's side of a follow or unfollow was written but the target's
    /// side was not. Repeating the same call repairs the edge.
    #[error("follow edge {actor} -> {target} half applied (follow={follow}); retry the call")]
    AsymmetricEdge {
        /// The account that acted.
        actor: AccountId,
        /// The account acted upon.
        target: AccountId,
        /// Whether the call was a follow (`true`) or unfollow (`false`).
        follow: bool,
        /// The failure on the target's record.
        #[source]
        source: StoreError,
    },

    /// No conversation with this ID.
    #[error("conversation not found: {conversation_id}")]
    ConversationNotFound {
        /// The conversation ID.
        conversation_id: String,
    },

    /// The conversation is being deleted.
    #[error("conversation is being deleted: {conversation_id}")]
    ConversationDeleting {
        /// The conversation ID.
        conversation_id: String,
    },

    /// The account does not take part in the conversation.
    #[error("account {account_id} is not a participant of {conversation_id}")]
    NotParticipant {
        /// The account ID.
        account_id: AccountId,
        /// The conversation ID.
        conversation_id: String,
    },

    /// A conversation needs two distinct accounts.
    #[error("cannot open a conversation with yourself")]
    SelfConversation,

    /// Message body is blank.
    #[error("message body is empty")]
    EmptyMessage,

    /// No notification with this ID for this owner.
    #[error("notification not found: {notification_id}")]
    NotificationNotFound {
        /// The notification ID.
        notification_id: String,
    },

    /// Store fault, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
