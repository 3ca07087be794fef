//! Notification generation.
//!
//! A notification is a projection of a social action, not part of it.
//! Callers that must not fail because of a notification use
//! [`NotificationGenerator::emit_best_effort`], which logs and swallows
//! write failures.

use std::sync::Arc;

use campus_social_core::{
    AccountId, Notification, NotificationId, NotificationType, SenderSnapshot, CREATED_AT_FIELD,
    READ_FIELD,
};
use campus_social_store::{keys, to_record, Direction, FieldOp, Query, Store, StoreError};
use serde_json::Value;

use crate::error::{GraphError, Result};

/// Writes and reads notification records.
#[derive(Clone)]
pub struct NotificationGenerator {
    store: Arc<dyn Store>,
}

impl NotificationGenerator {
    /// Create a generator over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Append a new notification for `owner`.
    ///
    /// Always creates a fresh record; repeated identical actions produce
    /// repeated notifications.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Store` if the write fails.
    pub async fn emit(
        &self,
        owner: AccountId,
        sender_id: AccountId,
        sender: SenderSnapshot,
        notification_type: NotificationType,
        message: impl Into<String> + Send,
        related_id: Option<String>,
    ) -> Result<Notification> {
        let notification = Notification::new(
            owner,
            sender_id,
            sender,
            notification_type,
            message.into(),
            related_id,
        );
        let path = keys::notification_path(&owner, &notification.id);
        self.store.set(&path, to_record(&notification)?).await?;

        tracing::debug!(
            owner_id = %owner,
            notification_id = %notification.id,
            kind = ?notification_type,
            "Notification emitted"
        );

        Ok(notification)
    }

    /// Like [`NotificationGenerator::emit`], but a failure is logged and
    /// returned as `None` instead of an error.
    pub async fn emit_best_effort(
        &self,
        owner: AccountId,
        sender_id: AccountId,
        sender: SenderSnapshot,
        notification_type: NotificationType,
        message: impl Into<String> + Send,
        related_id: Option<String>,
    ) -> Option<Notification> {
        match self
            .emit(owner, sender_id, sender, notification_type, message, related_id)
            .await
        {
            Ok(notification) => Some(notification),
            Err(e) => {
                tracing::warn!(
                    owner_id = %owner,
                    sender_id = %sender_id,
                    kind = ?notification_type,
                    error = %e,
                    "Failed to write notification - continuing without"
                );
                None
            }
        }
    }

    /// List `owner`'s notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Store` if the query fails or a record is malformed.
    pub async fn list(
        &self,
        owner: AccountId,
        limit: usize,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let mut query = Query::collection(keys::notifications_collection(&owner))
            .order_by(CREATED_AT_FIELD, Direction::Descending)
            .limit(limit);
        if unread_only {
            query = query.filter_eq(READ_FIELD, false);
        }

        self.store
            .query(&query)
            .await?
            .iter()
            .map(|doc| doc.decode().map_err(GraphError::from))
            .collect()
    }

    /// Mark one notification as read. Marking it again is a no-op.
    ///
    /// # Errors
    ///
    /// - `GraphError::NotificationNotFound` if `owner` has no such notification.
    /// - `GraphError::Store` if the write fails.
    pub async fn mark_read(&self, owner: AccountId, id: NotificationId) -> Result<()> {
        let path = keys::notification_path(&owner, &id);
        match self
            .store
            .update(&path, vec![(READ_FIELD.to_string(), FieldOp::Set(Value::Bool(true)))])
            .await
        {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound { .. }) => Err(GraphError::NotificationNotFound {
                notification_id: id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Mark every unread notification of `owner` as read.
    ///
    /// Returns how many were changed. Each record is updated on its own; a
    /// failure part way leaves the earlier ones marked.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Store` if a query or write fails.
    pub async fn mark_all_read(&self, owner: AccountId) -> Result<usize> {
        let query = Query::collection(keys::notifications_collection(&owner))
            .filter_eq(READ_FIELD, false);
        let unread = self.store.query(&query).await?;

        for doc in &unread {
            self.store
                .update(
                    &doc.path,
                    vec![(READ_FIELD.to_string(), FieldOp::Set(Value::Bool(true)))],
                )
                .await?;
        }

        tracing::debug!(owner_id = %owner, count = unread.len(), "Notifications marked read");
        Ok(unread.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_social_store::{Fault, MemoryStore};

    fn snapshot(name: &str) -> SenderSnapshot {
        SenderSnapshot {
            display_name: name.into(),
            username: name.to_lowercase(),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn identical_actions_are_not_deduplicated() {
        let generator = NotificationGenerator::new(Arc::new(MemoryStore::new()));
        let owner = AccountId::generate();
        let sender = AccountId::generate();

        for _ in 0..2 {
            generator
                .emit(
                    owner,
                    sender,
                    snapshot("Jean"),
                    NotificationType::NewFollower,
                    "Jean started following you",
                    None,
                )
                .await
                .unwrap();
        }

        let all = generator.list(owner, 10, false).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_ne!(all[0].id, all[1].id);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filters_unread() {
        let generator = NotificationGenerator::new(Arc::new(MemoryStore::new()));
        let owner = AccountId::generate();
        let sender = AccountId::generate();

        let first = generator
            .emit(
                owner,
                sender,
                snapshot("A"),
                NotificationType::Like,
                "liked",
                Some("post-1".into()),
            )
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = generator
            .emit(owner, sender, snapshot("A"), NotificationType::Comment, "commented", None)
            .await
            .unwrap();

        let all = generator.list(owner, 10, false).await.unwrap();
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
        assert_eq!(all[1].related_id.as_deref(), Some("post-1"));

        generator.mark_read(owner, second.id).await.unwrap();
        generator.mark_read(owner, second.id).await.unwrap();

        let unread = generator.list(owner, 10, true).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, first.id);
    }

    #[tokio::test]
    async fn mark_read_on_missing_notification() {
        let generator = NotificationGenerator::new(Arc::new(MemoryStore::new()));
        let err = generator
            .mark_read(AccountId::generate(), NotificationId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::NotificationNotFound { .. }));
    }

    #[tokio::test]
    async fn mark_all_read_counts_changes() {
        let generator = NotificationGenerator::new(Arc::new(MemoryStore::new()));
        let owner = AccountId::generate();
        let sender = AccountId::generate();
        for kind in [NotificationType::CarpoolBooking, NotificationType::EventAttendance] {
            generator
                .emit(owner, sender, snapshot("B"), kind, "hello", None)
                .await
                .unwrap();
        }

        assert_eq!(generator.mark_all_read(owner).await.unwrap(), 2);
        assert_eq!(generator.mark_all_read(owner).await.unwrap(), 0);
        assert!(generator.list(owner, 10, true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn best_effort_swallows_write_failures() {
        let store = Arc::new(MemoryStore::new());
        let owner = AccountId::generate();
        store.inject_fault(Fault::FailWritesUnder(keys::notifications_collection(&owner)));
        let generator = NotificationGenerator::new(store);

        let emitted = generator
            .emit_best_effort(
                owner,
                AccountId::generate(),
                snapshot("C"),
                NotificationType::Message,
                "hi",
                None,
            )
            .await;
        assert!(emitted.is_none());
    }
}
