//! Conversation creation and messaging.
//!
//! Conversations are created lazily on first contact and keyed by their
//! participant pair. Writers check the `deleting` flag after writing a
//! message, and the destroyer sets that flag before listing the subtree, so
//! a message either lands before the listing (and is deleted with the rest)
//! or is withdrawn by its writer.

use std::sync::Arc;

use campus_social_core::{
    AccountId, Conversation, ConversationId, Message, NotificationType, SenderSnapshot,
    CREATED_AT_FIELD,
};
use campus_social_store::{
    from_record, keys, to_record, Direction, FieldOp, Query, Store, StoreError,
};
use serde_json::Value;

use crate::error::{GraphError, Result};
use crate::identity::load_account;
use crate::notifications::NotificationGenerator;

/// Opens conversations and reads and writes their messages.
#[derive(Clone)]
pub struct Conversations {
    store: Arc<dyn Store>,
    notifications: NotificationGenerator,
}

impl Conversations {
    /// Create a conversation service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, notifications: NotificationGenerator) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Return the conversation between `a` and `b`, creating it if needed.
    ///
    /// # Errors
    ///
    /// - `GraphError::SelfConversation` if `a == b`.
    /// - `GraphError::ConversationDeleting` while a previous conversation
    ///   between the two is still being deleted.
    /// - `GraphError::Store` if a read or write fails.
    pub async fn open(&self, a: AccountId, b: AccountId) -> Result<Conversation> {
        let id = ConversationId::for_pair(a, b).map_err(|_| GraphError::SelfConversation)?;
        let path = keys::conversation_path(&id);

        if let Some(record) = self.store.get(&path).await? {
            let existing: Conversation = from_record(record)?;
            if existing.deleting {
                return Err(GraphError::ConversationDeleting {
                    conversation_id: id.to_string(),
                });
            }
            return Ok(existing);
        }

        let conversation = Conversation::new(id.clone());
        self.store.set(&path, to_record(&conversation)?).await?;
        tracing::info!(conversation_id = %id, "Conversation opened");

        Ok(conversation)
    }

    /// Read a conversation root.
    ///
    /// # Errors
    ///
    /// - `GraphError::ConversationNotFound` if it does not exist.
    /// - `GraphError::Store` if the read fails.
    pub async fn get(&self, id: &ConversationId) -> Result<Conversation> {
        let record = self
            .store
            .get(&keys::conversation_path(id))
            .await?
            .ok_or_else(|| GraphError::ConversationNotFound {
                conversation_id: id.to_string(),
            })?;
        Ok(from_record(record)?)
    }

    /// Append a message from `sender` and notify the other participant.
    ///
    /// # Errors
    ///
    /// - `GraphError::NotParticipant` if `sender` is not in the conversation.
    /// - `GraphError::EmptyMessage` if `body` is blank.
    /// - `GraphError::ConversationNotFound` if it does not exist.
    /// - `GraphError::ConversationDeleting` if deletion has started.
    /// - `GraphError::Store` if a read or write fails.
    pub async fn send_message(
        &self,
        id: &ConversationId,
        sender: AccountId,
        body: &str,
    ) -> Result<Message> {
        let Some(recipient) = id.other(sender) else {
            return Err(GraphError::NotParticipant {
                account_id: sender,
                conversation_id: id.to_string(),
            });
        };
        let body = body.trim();
        if body.is_empty() {
            return Err(GraphError::EmptyMessage);
        }

        self.ensure_open(id).await?;

        let message = Message::new(sender, body.to_string());
        let message_path = keys::message_path(id, &message.id);
        self.store.set(&message_path, to_record(&message)?).await?;

        // Re-check after the write; see the module docs.
        if let Err(e) = self.record_preview(id, &message).await {
            if let Err(cleanup) = self.store.delete(&message_path).await {
                tracing::warn!(
                    conversation_id = %id,
                    message_id = %message.id,
                    error = %cleanup,
                    "Failed to withdraw message from closed conversation"
                );
            }
            return Err(e);
        }

        tracing::debug!(conversation_id = %id, message_id = %message.id, "Message sent");

        match load_account(self.store.as_ref(), sender).await {
            Ok(account) => {
                let snapshot = SenderSnapshot::from(&account);
                let text = format!("{} sent you a message", snapshot.display_name);
                self.notifications
                    .emit_best_effort(
                        recipient,
                        sender,
                        snapshot,
                        NotificationType::Message,
                        text,
                        Some(id.to_string()),
                    )
                    .await;
            }
            Err(e) => {
                tracing::warn!(
                    account_id = %sender,
                    error = %e,
                    "Could not load sender profile - skipping notification"
                );
            }
        }

        Ok(message)
    }

    /// The most recent `limit` messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Store` if the query fails or a record is malformed.
    pub async fn list_messages(&self, id: &ConversationId, limit: usize) -> Result<Vec<Message>> {
        let query = Query::collection(keys::messages_collection(id))
            .order_by(CREATED_AT_FIELD, Direction::Descending)
            .limit(limit);

        let mut messages = self
            .store
            .query(&query)
            .await?
            .iter()
            .map(|doc| doc.decode().map_err(GraphError::from))
            .collect::<Result<Vec<Message>>>()?;
        messages.reverse();
        Ok(messages)
    }

    async fn ensure_open(&self, id: &ConversationId) -> Result<()> {
        let conversation = self.get(id).await?;
        if conversation.deleting {
            return Err(GraphError::ConversationDeleting {
                conversation_id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn record_preview(&self, id: &ConversationId, message: &Message) -> Result<()> {
        self.ensure_open(id).await?;

        let at = Value::String(message.created_at.to_rfc3339());
        let ops = vec![
            ("lastMessage".to_string(), FieldOp::Set(Value::String(message.preview()))),
            ("lastMessageAt".to_string(), FieldOp::Set(at.clone())),
            ("updatedAt".to_string(), FieldOp::Set(at)),
        ];
        match self.store.update(&keys::conversation_path(id), ops).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound { .. }) => Err(GraphError::ConversationDeleting {
                conversation_id: id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
