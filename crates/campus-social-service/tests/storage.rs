//! Store selection tests.

use campus_social_service::{open_store, ServiceConfig, StorageBackend};
use campus_social_store::Store;

#[tokio::test]
async fn memory_backend_opens() {
    let config = ServiceConfig::default();
    let store = open_store(&config).unwrap();
    assert!(store.get("accounts/nobody").await.unwrap().is_none());
}

#[cfg(not(feature = "rocksdb-backend"))]
#[test]
fn rocksdb_backend_requires_the_feature() {
    let config = ServiceConfig {
        storage_backend: StorageBackend::RocksDb,
        ..ServiceConfig::default()
    };
    assert!(open_store(&config).is_err());
}

#[cfg(feature = "rocksdb-backend")]
#[tokio::test]
async fn rocksdb_backend_persists_across_reopen() {
    use campus_social_core::AccountId;
    use campus_social_graph::{GraphConfig, Registration, SocialGraph};

    let dir = tempfile::TempDir::new().unwrap();
    let config = ServiceConfig {
        storage_backend: StorageBackend::RocksDb,
        data_dir: dir.path().to_string_lossy().to_string(),
        ..ServiceConfig::default()
    };
    let id = AccountId::generate();

    {
        let graph = SocialGraph::new(open_store(&config).unwrap(), GraphConfig::default());
        graph
            .identity
            .register_account(
                id,
                Registration {
                    email: "jean@uni.edu".into(),
                    ..Registration::default()
                },
            )
            .await
            .unwrap();
    }

    let graph = SocialGraph::new(open_store(&config).unwrap(), GraphConfig::default());
    let account = graph.identity.get_account(id).await.unwrap();
    assert_eq!(account.username.as_str(), "jean");
}
