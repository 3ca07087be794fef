//! Application state.

use std::sync::Arc;

use campus_social_graph::{GraphConfig, SocialGraph};
use campus_social_store::{MemoryStore, Store, StoreError};

use crate::config::{ServiceConfig, StorageBackend};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Social graph operations over `store`.
    pub graph: SocialGraph,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        let graph = SocialGraph::new(
            store.clone(),
            GraphConfig {
                max_username_probes: config.username_max_probes,
            },
        );

        Self {
            store,
            graph,
            config,
        }
    }
}

/// Open the store selected by `config`.
///
/// # Errors
///
/// Returns `StoreError::Database` if the backend cannot be opened, or if
/// `RocksDB` was requested from a build without the `rocksdb-backend` feature.
pub fn open_store(config: &ServiceConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store - data will not survive a restart");
            Ok(Arc::new(MemoryStore::with_delete_batch_size(
                config.delete_batch_size,
            )))
        }
        #[cfg(feature = "rocksdb-backend")]
        StorageBackend::RocksDb => {
            tracing::info!(path = %config.data_dir, "Opening RocksDB store");
            Ok(Arc::new(
                campus_social_store::RocksStore::open_with_delete_batch_size(
                    &config.data_dir,
                    config.delete_batch_size,
                )?,
            ))
        }
        #[cfg(not(feature = "rocksdb-backend"))]
        StorageBackend::RocksDb => Err(StoreError::Database(
            "built without the rocksdb-backend feature".into(),
        )),
    }
}
