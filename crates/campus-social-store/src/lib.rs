//! Document storage layer for campus-social.
//!
//! This crate defines the [`Store`] trait the identity and social-graph layer
//! is written against, plus two backends:
//!
//! - [`MemoryStore`]: an in-process `BTreeMap`, with fault injection for tests
//! - `RocksStore`: persistent `RocksDB` storage (feature `rocksdb-backend`)
//!
//! # Guarantees
//!
//! Each call touches one record atomically, with the exception of
//! [`Store::recursive_delete`], which removes a subtree in batches and can
//! stop partway. There are no multi-record transactions.
//!
//! # Example
//!
//! ```
//! use campus_social_store::{FieldOp, MemoryStore, Store};
//! use serde_json::json;
//!
//! # async fn example() -> campus_social_store::Result<()> {
//! let store = MemoryStore::new();
//! store.set("accounts/a", campus_social_store::to_record(&json!({ "followerIds": [] }))?).await?;
//! store
//!     .update("accounts/a", vec![("followerIds".into(), FieldOp::union("b"))])
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod document;
pub mod error;
pub mod keys;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;

pub use document::{
    apply_field_ops, from_record, to_record, Direction, Document, FieldOp, Filter, OrderBy, Query,
    Record,
};
pub use error::{Result, StoreError};
pub use memory::{Fault, MemoryStore};
pub use schema::DEFAULT_DELETE_BATCH_SIZE;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

/// The storage trait defining all document operations.
///
/// Every call is asynchronous and may fail with a transport error that is
/// distinct from "not found".
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Read a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get(&self, path: &str) -> Result<Option<Record>>;

    /// Run a query over the direct children of a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn query(&self, query: &Query) -> Result<Vec<Document>>;

    /// Insert or replace a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn set(&self, path: &str, record: Record) -> Result<()>;

    /// Apply field operations to an existing record atomically.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record doesn't exist.
    async fn update(&self, path: &str, ops: Vec<(String, FieldOp)>) -> Result<()>;

    /// Delete a single record. Deleting a missing record succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Delete a record and every record nested beneath it.
    ///
    /// Descendants are removed deepest-first in batches and the record at
    /// `path` goes last. The operation is not atomic: on error, some
    /// descendants may already be gone. Calling it again finishes the job.
    /// Returns the number of records removed by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn recursive_delete(&self, path: &str) -> Result<usize>;
}
