//! Path construction and validation.
//!
//! A path is a non-empty sequence of non-empty segments joined by `/`.
//! Document paths have an even number of segments, collection paths an odd one.

use campus_social_core::{AccountId, ConversationId, MessageId, NotificationId};

use crate::error::{Result, StoreError};
use crate::schema::collections;

/// Path of an account record.
#[must_use]
pub fn account_path(id: &AccountId) -> String {
    format!("{}/{id}", collections::ACCOUNTS)
}

/// Path of an account's notification collection.
#[must_use]
pub fn notifications_collection(owner: &AccountId) -> String {
    format!("{}/{}", account_path(owner), collections::NOTIFICATIONS)
}

/// Path of a notification record.
#[must_use]
pub fn notification_path(owner: &AccountId, id: &NotificationId) -> String {
    format!("{}/{id}", notifications_collection(owner))
}

/// Path of a conversation root.
#[must_use]
pub fn conversation_path(id: &ConversationId) -> String {
    format!("{}/{id}", collections::CONVERSATIONS)
}

/// Path of a conversation's message collection.
#[must_use]
pub fn messages_collection(conversation: &ConversationId) -> String {
    format!("{}/{}", conversation_path(conversation), collections::MESSAGES)
}

/// Path of a message record.
#[must_use]
pub fn message_path(conversation: &ConversationId, id: &MessageId) -> String {
    format!("{}/{id}", messages_collection(conversation))
}

fn segments(path: &str) -> Result<usize> {
    if path.is_empty() || path.split('/').any(str::is_empty) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(path.split('/').count())
}

/// Check that `path` addresses a document.
///
/// # Errors
///
/// Returns `StoreError::InvalidPath` otherwise.
pub fn validate_document_path(path: &str) -> Result<()> {
    if segments(path)? % 2 == 0 {
        Ok(())
    } else {
        Err(StoreError::InvalidPath(path.to_string()))
    }
}

/// Check that `path` addresses a collection.
///
/// # Errors
///
/// Returns `StoreError::InvalidPath` otherwise.
pub fn validate_collection_path(path: &str) -> Result<()> {
    if segments(path)? % 2 == 1 {
        Ok(())
    } else {
        Err(StoreError::InvalidPath(path.to_string()))
    }
}

/// Whether `path` is a document directly inside `collection`.
#[must_use]
pub fn is_direct_child(collection: &str, path: &str) -> bool {
    path.strip_prefix(collection)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|id| !id.is_empty() && !id.contains('/'))
}

/// Whether `path` is `root` or anywhere beneath it.
#[must_use]
pub fn is_within(root: &str, path: &str) -> bool {
    path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Number of segments in an already-validated path.
#[must_use]
pub fn depth(path: &str) -> usize {
    path.split('/').count()
}

/// Sort paths so that descendants come before their ancestors.
///
/// Used by recursive deletes: the subtree root is removed last, so an
/// interrupted delete never leaves children without their root.
pub fn sort_deepest_first(paths: &mut [String]) {
    paths.sort_by(|a, b| depth(b).cmp(&depth(a)).then_with(|| a.cmp(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_produce_valid_paths() {
        let owner = AccountId::generate();
        let other = AccountId::generate();
        let conversation = ConversationId::for_pair(owner, other).unwrap();

        validate_document_path(&account_path(&owner)).unwrap();
        validate_collection_path(&notifications_collection(&owner)).unwrap();
        validate_document_path(&notification_path(&owner, &NotificationId::generate())).unwrap();
        validate_document_path(&conversation_path(&conversation)).unwrap();
        validate_collection_path(&messages_collection(&conversation)).unwrap();
        validate_document_path(&message_path(&conversation, &MessageId::generate())).unwrap();
    }

    #[test]
    fn malformed_paths_are_rejected() {
        assert!(validate_document_path("").is_err());
        assert!(validate_document_path("accounts").is_err());
        assert!(validate_document_path("accounts//x").is_err());
        assert!(validate_collection_path("accounts/x").is_err());
    }

    #[test]
    fn direct_children_exclude_grandchildren() {
        assert!(is_direct_child("accounts", "accounts/a"));
        assert!(!is_direct_child("accounts", "accounts/a/notifications/n"));
        assert!(!is_direct_child("accounts", "accountsx/a"));
        assert!(!is_direct_child("accounts", "accounts"));
    }

    #[test]
    fn within_matches_root_and_descendants_only() {
        assert!(is_within("conversations/c", "conversations/c"));
        assert!(is_within("conversations/c", "conversations/c/messages/m"));
        assert!(!is_within("conversations/c", "conversations/c2"));
    }

    #[test]
    fn deepest_paths_sort_first() {
        let mut paths = vec![
            "conversations/c".to_string(),
            "conversations/c/messages/b".to_string(),
            "conversations/c/messages/a".to_string(),
        ];
        sort_deepest_first(&mut paths);
        assert_eq!(
            paths,
            vec![
                "conversations/c/messages/a",
                "conversations/c/messages/b",
                "conversations/c",
            ]
        );
    }
}
