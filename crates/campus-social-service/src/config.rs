//! Service configuration.

use std::fmt;
use std::str::FromStr;

use campus_social_graph::DEFAULT_MAX_USERNAME_PROBES;
use campus_social_store::DEFAULT_DELETE_BATCH_SIZE;

/// Which store backend the service runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local map; data is lost on restart.
    Memory,
    /// `RocksDB` under `data_dir` (needs the `rocksdb-backend` feature).
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "rocksdb" | "rocks" => Ok(Self::RocksDb),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::RocksDb => f.write_str("rocksdb"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/campus-social").
    pub data_dir: String,

    /// Store backend (default: memory).
    pub storage_backend: StorageBackend,

    /// ZID JWT validation base URL (default: `<https://zid.zero.tech>`).
    pub auth_base_url: String,

    /// Expected JWT audience (default: "campus-social").
    pub auth_audience: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Records removed per batch by a recursive delete.
    pub delete_batch_size: usize,

    /// Cap on derived username candidates probed per registration.
    pub username_max_probes: u32,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let storage_backend = match std::env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "Ignoring STORAGE_BACKEND");
                defaults.storage_backend
            }),
            Err(_) => defaults.storage_backend,
        };

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            data_dir: std::env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            storage_backend,
            auth_base_url: std::env::var("AUTH_BASE_URL").unwrap_or(defaults.auth_base_url),
            auth_audience: std::env::var("AUTH_AUDIENCE").unwrap_or(defaults.auth_audience),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or(defaults.cors_origins),
            max_body_bytes: env_parse("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(defaults.request_timeout_seconds),
            delete_batch_size: env_parse("DELETE_BATCH_SIZE")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.delete_batch_size),
            username_max_probes: env_parse("USERNAME_MAX_PROBES")
                .filter(|n: &u32| *n > 0)
                .unwrap_or(defaults.username_max_probes),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/campus-social".into(),
            storage_backend: StorageBackend::Memory,
            auth_base_url: "https://zid.zero.tech".into(),
            auth_audience: "campus-social".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            delete_batch_size: DEFAULT_DELETE_BATCH_SIZE,
            username_max_probes: DEFAULT_MAX_USERNAME_PROBES,
        }
    }
}
