//! Collection names and storage layout.
//!
//! Records live in a hierarchy of collections and documents addressed by
//! slash-separated paths:
//!
//! ```text
//! accounts/{accountId}
//! accounts/{accountId}/notifications/{notificationId}
//! conversations/{conversationId}
//! conversations/{conversationId}/messages/{messageId}
//! ```

/// Collection names.
pub mod collections {
    /// Account records, keyed by account ID.
    pub const ACCOUNTS: &str = "accounts";

    /// Notifications, nested under the owning account.
    pub const NOTIFICATIONS: &str = "notifications";

    /// Conversation roots, keyed by conversation ID.
    pub const CONVERSATIONS: &str = "conversations";

    /// Messages, nested under their conversation.
    pub const MESSAGES: &str = "messages";
}

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Every document, keyed by its full path.
    pub const DOCUMENTS: &str = "documents";
}

/// Default number of records removed per recursive-delete batch.
pub const DEFAULT_DELETE_BATCH_SIZE: usize = 100;

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::DOCUMENTS]
}
