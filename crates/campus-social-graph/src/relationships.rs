//! Follow edges.
//!
//! An edge A -> B is written twice: B goes into A's `followingIds` and A goes
//! into B's `followerIds`. The two writes are separate single-record updates
//! issued in that order. If the second one fails the edge is left
//! half-applied and the caller gets `GraphError::AsymmetricEdge`; repeating
//! the call converges because array union and remove are idempotent.
//! Each write also stamps `updatedAt` on the record it touches.

use std::sync::Arc;

use campus_social_core::{
    AccountId, NotificationType, SenderSnapshot, FOLLOWER_IDS_FIELD, FOLLOWING_IDS_FIELD,
    UPDATED_AT_FIELD,
};
use campus_social_store::{keys, FieldOp, Store};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::error::{GraphError, Result};
use crate::identity::load_account;
use crate::notifications::NotificationGenerator;

/// What [`RelationshipManager::set_following`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    /// Both sides now record the edge.
    Followed,
    /// Neither side records the edge.
    Unfollowed,
    /// Actor and target were the same account; nothing was written.
    Unchanged,
}

/// Maintains the follow graph.
#[derive(Clone)]
pub struct RelationshipManager {
    store: Arc<dyn Store>,
    notifications: NotificationGenerator,
}

impl RelationshipManager {
    /// Create a manager over `store`, notifying through `notifications`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, notifications: NotificationGenerator) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Follow (`follow == true`) or unfollow `target` on behalf of `actor`.
    ///
    /// Self-follows succeed without writing anything. The existing state is
    /// not checked first; redundant calls are harmless. A successful follow
    /// sends the target a `new_follower` notification on a best-effort basis.
    ///
    /// # Errors
    ///
    /// - `GraphError::Store` if the actor's update fails; nothing was changed.
    /// - `GraphError::AsymmetricEdge` if the target's update fails after the
    ///   actor's succeeded.
    pub async fn set_following(
        &self,
        actor: AccountId,
        target: AccountId,
        follow: bool,
    ) -> Result<FollowOutcome> {
        if actor == target {
            tracing::debug!(account_id = %actor, "Ignoring self-follow");
            return Ok(FollowOutcome::Unchanged);
        }

        let (actor_op, target_op) = if follow {
            (
                FieldOp::union(target.to_string()),
                FieldOp::union(actor.to_string()),
            )
        } else {
            (
                FieldOp::remove(target.to_string()),
                FieldOp::remove(actor.to_string()),
            )
        };

        let now = Value::String(Utc::now().to_rfc3339());

        self.store
            .update(
                &keys::account_path(&actor),
                vec![
                    (FOLLOWING_IDS_FIELD.to_string(), actor_op),
                    (UPDATED_AT_FIELD.to_string(), FieldOp::Set(now.clone())),
                ],
            )
            .await?;

        if let Err(source) = self
            .store
            .update(
                &keys::account_path(&target),
                vec![
                    (FOLLOWER_IDS_FIELD.to_string(), target_op),
                    (UPDATED_AT_FIELD.to_string(), FieldOp::Set(now)),
                ],
            )
            .await
        {
            tracing::warn!(
                actor_id = %actor,
                target_id = %target,
                follow,
                error = %source,
                "Follow edge left asymmetric"
            );
            return Err(GraphError::AsymmetricEdge {
                actor,
                target,
                follow,
                source,
            });
        }

        if follow {
            self.notify_new_follower(actor, target).await;
            tracing::info!(actor_id = %actor, target_id = %target, "Followed");
            Ok(FollowOutcome::Followed)
        } else {
            tracing::info!(actor_id = %actor, target_id = %target, "Unfollowed");
            Ok(FollowOutcome::Unfollowed)
        }
    }

    async fn notify_new_follower(&self, actor: AccountId, target: AccountId) {
        let sender = match load_account(self.store.as_ref(), actor).await {
            Ok(account) => SenderSnapshot::from(&account),
            Err(e) => {
                tracing::warn!(
                    actor_id = %actor,
                    error = %e,
                    "Could not load follower profile - skipping notification"
                );
                return;
            }
        };

        let message = format!("{} started following you", sender.display_name);
        self.notifications
            .emit_best_effort(
                target,
                actor,
                sender,
                NotificationType::NewFollower,
                message,
                None,
            )
            .await;
    }

    /// Accounts following `id`.
    ///
    /// # Errors
    ///
    /// - `GraphError::AccountNotFound` if there is no such account.
    /// - `GraphError::Store` if the read fails.
    pub async fn followers(&self, id: AccountId) -> Result<Vec<AccountId>> {
        Ok(load_account(self.store.as_ref(), id).await?.follower_ids)
    }

    /// Accounts `id` follows.
    ///
    /// # Errors
    ///
    /// - `GraphError::AccountNotFound` if there is no such account.
    /// - `GraphError::Store` if the read fails.
    pub async fn following(&self, id: AccountId) -> Result<Vec<AccountId>> {
        Ok(load_account(self.store.as_ref(), id).await?.following_ids)
    }

    /// Whether `actor` follows `target`, according to the actor's list.
    ///
    /// # Errors
    ///
    /// - `GraphError::AccountNotFound` if `actor` does not exist.
    /// - `GraphError::Store` if the read fails.
    pub async fn is_following(&self, actor: AccountId, target: AccountId) -> Result<bool> {
        Ok(load_account(self.store.as_ref(), actor).await?.follows(target))
    }
}
