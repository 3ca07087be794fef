//! Conversation deletion.
//!
//! A conversation and its messages are deleted as one unit. The store can
//! only delete a subtree in batches, so deletion is a resumable job: the
//! root is flagged `deleting`, the messages go first, and the root goes
//! last. An interrupted run leaves the flagged root behind; calling
//! [`AggregateDestroyer::delete_conversation`] again finishes the job.

use std::sync::Arc;

use campus_social_core::{ConversationId, DELETING_FIELD};
use campus_social_store::{keys, FieldOp, Store, StoreError};
use serde::Serialize;
use serde_json::Value;

/// Result of a delete request.
///
/// `success == false` means the conversation may be partially deleted.
/// Retrying is safe and is the only way to recover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// Whether the whole aggregate is gone.
    pub success: bool,
    /// Human-readable explanation.
    pub message: String,
    /// Records removed by this call (0 on failure).
    pub deleted: usize,
}

impl DeleteOutcome {
    fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
            deleted: 0,
        }
    }
}

/// Deletes conversation aggregates.
#[derive(Clone)]
pub struct AggregateDestroyer {
    store: Arc<dyn Store>,
}

impl AggregateDestroyer {
    /// Create a destroyer over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Delete the conversation `id` and all of its messages.
    ///
    /// Never returns an error: failures are reported through
    /// `DeleteOutcome::success`. Deleting a conversation that is already
    /// gone succeeds.
    pub async fn delete_conversation(&self, id: &ConversationId) -> DeleteOutcome {
        let path = keys::conversation_path(id);

        // Flag first so writers stop adding messages before the subtree is listed.
        match self
            .store
            .update(&path, vec![(DELETING_FIELD.to_string(), FieldOp::Set(Value::Bool(true)))])
            .await
        {
            Ok(()) | Err(StoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::warn!(
                    conversation_id = %id,
                    error = %e,
                    "Failed to flag conversation for deletion"
                );
                return DeleteOutcome::failed(format!("Failed to delete conversation: {e}"));
            }
        }

        match self.store.recursive_delete(&path).await {
            Ok(0) => {
                tracing::debug!(conversation_id = %id, "Conversation already deleted");
                DeleteOutcome {
                    success: true,
                    message: "Conversation already deleted".to_string(),
                    deleted: 0,
                }
            }
            Ok(deleted) => {
                tracing::info!(conversation_id = %id, deleted, "Conversation deleted");
                DeleteOutcome {
                    success: true,
                    message: "Conversation deleted".to_string(),
                    deleted,
                }
            }
            Err(e) => {
                tracing::warn!(conversation_id = %id, error = %e, "Conversation partially deleted");
                DeleteOutcome::failed(format!(
                    "Conversation was only partially deleted, retry to finish: {e}"
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_social_core::{AccountId, Conversation};
    use campus_social_store::{to_record, Fault, MemoryStore, Record};

    async fn seed(store: &MemoryStore, messages: usize) -> ConversationId {
        let id = ConversationId::for_pair(AccountId::generate(), AccountId::generate()).unwrap();
        store
            .set(
                &keys::conversation_path(&id),
                to_record(&Conversation::new(id.clone())).unwrap(),
            )
            .await
            .unwrap();
        for i in 0..messages {
            store
                .set(
                    &format!("{}/m{i:04}", keys::messages_collection(&id)),
                    Record::new(),
                )
                .await
                .unwrap();
        }
        id
    }

    #[tokio::test]
    async fn deletes_root_and_messages() {
        let store = Arc::new(MemoryStore::new());
        let id = seed(&store, 3).await;
        let destroyer = AggregateDestroyer::new(store.clone());

        let outcome = destroyer.delete_conversation(&id).await;
        assert!(outcome.success);
        assert_eq!(outcome.deleted, 4);
        assert_eq!(store.count_within(&keys::conversation_path(&id)), 0);
    }

    #[tokio::test]
    async fn missing_conversation_is_a_successful_noop() {
        let destroyer = AggregateDestroyer::new(Arc::new(MemoryStore::new()));
        let id = ConversationId::for_pair(AccountId::generate(), AccountId::generate()).unwrap();
        let outcome = destroyer.delete_conversation(&id).await;
        assert!(outcome.success);
        assert_eq!(outcome.deleted, 0);
    }

    #[tokio::test]
    async fn flag_failure_reports_without_deleting() {
        let store = Arc::new(MemoryStore::new());
        let id = seed(&store, 2).await;
        store.inject_fault(Fault::FailWritesAt(keys::conversation_path(&id)));
        let destroyer = AggregateDestroyer::new(store.clone());

        let outcome = destroyer.delete_conversation(&id).await;
        assert!(!outcome.success);
        assert_eq!(store.count_within(&keys::conversation_path(&id)), 3);
    }

    #[tokio::test]
    async fn interrupted_delete_leaves_flagged_root() {
        let store = Arc::new(MemoryStore::new());
        let id = seed(&store, 5).await;
        store.inject_fault(Fault::FailDeleteAfter(2));
        let destroyer = AggregateDestroyer::new(store.clone());

        let outcome = destroyer.delete_conversation(&id).await;
        assert!(!outcome.success);

        let root = store
            .get(&keys::conversation_path(&id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(root[DELETING_FIELD], Value::Bool(true));
    }
}
