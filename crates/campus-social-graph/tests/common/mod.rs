//! Shared helpers for graph integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use campus_social_core::{Account, AccountId, Profile};
use campus_social_graph::{GraphConfig, Registration, SocialGraph};
use campus_social_store::{Document, FieldOp, MemoryStore, Query, Record, Result, Store};

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub graph: SocialGraph,
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let graph = SocialGraph::new(store.clone(), GraphConfig::default());
    Harness { store, graph }
}

/// A harness whose store suspends before every call, so joined operations
/// interleave at each store round trip instead of running back to back.
pub fn yielding_harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let yielding = Arc::new(YieldingStore {
        inner: store.clone(),
    });
    let graph = SocialGraph::new(yielding, GraphConfig::default());
    Harness { store, graph }
}

/// Hands control back to the runtime before delegating to the memory store.
pub struct YieldingStore {
    inner: Arc<MemoryStore>,
}

#[async_trait::async_trait]
impl Store for YieldingStore {
    async fn get(&self, path: &str) -> Result<Option<Record>> {
        tokio::task::yield_now().await;
        self.inner.get(path).await
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        tokio::task::yield_now().await;
        self.inner.query(query).await
    }

    async fn set(&self, path: &str, record: Record) -> Result<()> {
        tokio::task::yield_now().await;
        self.inner.set(path, record).await
    }

    async fn update(&self, path: &str, ops: Vec<(String, FieldOp)>) -> Result<()> {
        tokio::task::yield_now().await;
        self.inner.update(path, ops).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        tokio::task::yield_now().await;
        self.inner.delete(path).await
    }

    async fn recursive_delete(&self, path: &str) -> Result<usize> {
        self.inner.recursive_delete(path).await
    }
}

impl Harness {
    pub async fn register(&self, email: &str, desired: Option<&str>) -> Account {
        self.graph
            .identity
            .register_account(
                AccountId::generate(),
                Registration {
                    email: email.into(),
                    desired_username: desired.map(Into::into),
                    profile: Profile {
                        first_name: Some(email.split('@').next().unwrap_or(email).into()),
                        ..Profile::default()
                    },
                },
            )
            .await
            .unwrap()
    }

    pub async fn account(&self, id: AccountId) -> Account {
        self.graph.identity.get_account(id).await.unwrap()
    }
}
