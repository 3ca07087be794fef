//! Identity and social-graph operations for campus-social.
//!
//! Four cooperating components share one [`Store`]:
//!
//! - [`IdentityAllocator`]: store-wide unique usernames and account registration
//! - [`RelationshipManager`]: follow/unfollow across two denormalized lists
//! - [`NotificationGenerator`]: best-effort notifications derived from actions
//! - [`AggregateDestroyer`]: resumable deletion of a conversation and its messages
//!
//! [`Conversations`] covers the lazily created conversation and its messages,
//! so the aggregate can be exercised end to end.
//!
//! # Consistency
//!
//! The store offers atomic updates on one record at a time and nothing
//! wider. Each operation documents the intermediate state a failure can
//! leave behind and how a retry resolves it. No operation retries on its own.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use campus_social_core::AccountId;
//! use campus_social_graph::{GraphConfig, Registration, SocialGraph};
//! use campus_social_store::MemoryStore;
//!
//! # async fn example() -> campus_social_graph::Result<()> {
//! let graph = SocialGraph::new(Arc::new(MemoryStore::new()), GraphConfig::default());
//!
//! let alice = AccountId::generate();
//! let bob = AccountId::generate();
//! let registration = Registration {
//!     email: "alice@uni.edu".into(),
//!     ..Default::default()
//! };
//! graph.identity.register_account(alice, registration).await?;
//! let registration = Registration {
//!     email: "bob@uni.edu".into(),
//!     ..Default::default()
//! };
//! graph.identity.register_account(bob, registration).await?;
//!
//! graph.relationships.set_following(alice, bob, true).await?;
//! assert!(graph.relationships.is_following(alice, bob).await?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod conversations;
pub mod destroyer;
pub mod error;
pub mod identity;
pub mod notifications;
pub mod relationships;

use std::sync::Arc;

use campus_social_store::Store;

pub use conversations::Conversations;
pub use destroyer::{AggregateDestroyer, DeleteOutcome};
pub use error::{GraphError, Result};
pub use identity::{IdentityAllocator, Registration, DEFAULT_MAX_USERNAME_PROBES};
pub use notifications::NotificationGenerator;
pub use relationships::{FollowOutcome, RelationshipManager};

/// Tunables for the social graph.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Cap on derived username candidates probed per registration.
    pub max_username_probes: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_username_probes: DEFAULT_MAX_USERNAME_PROBES,
        }
    }
}

/// All components wired to one store.
#[derive(Clone)]
pub struct SocialGraph {
    /// Username allocation and accounts.
    pub identity: IdentityAllocator,
    /// Follow graph.
    pub relationships: RelationshipManager,
    /// Notifications.
    pub notifications: NotificationGenerator,
    /// Conversations and messages.
    pub conversations: Conversations,
    /// Conversation deletion.
    pub destroyer: AggregateDestroyer,
}

impl SocialGraph {
    /// Wire every component to `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: GraphConfig) -> Self {
        let notifications = NotificationGenerator::new(store.clone());
        Self {
            identity: IdentityAllocator::new(store.clone())
                .with_max_probes(config.max_username_probes),
            relationships: RelationshipManager::new(store.clone(), notifications.clone()),
            conversations: Conversations::new(store.clone(), notifications.clone()),
            destroyer: AggregateDestroyer::new(store),
            notifications,
        }
    }
}
