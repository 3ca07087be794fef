//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.
//! Every record lives in one column family keyed by its full path, so a
//! collection or subtree is a contiguous key range.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction as ScanDirection,
    IteratorMode, MultiThreaded, Options, WriteBatch,
};

use crate::document::{apply_field_ops, Document, FieldOp, Query, Record};
use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf, DEFAULT_DELETE_BATCH_SIZE};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serializes read-modify-write updates so each one is atomic per record.
    write_lock: Mutex<()>,
    delete_batch_size: usize,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_delete_batch_size(path, DEFAULT_DELETE_BATCH_SIZE)
    }

    /// Open or create a database that deletes `batch_size` records per batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open_with_delete_batch_size<P: AsRef<Path>>(path: P, batch_size: usize) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
            delete_batch_size: batch_size.max(1),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a record using CBOR.
    fn serialize(record: &Record) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(record, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a record from CBOR.
    fn deserialize(data: &[u8]) -> Result<Record> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn read(&self, path: &str) -> Result<Option<Record>> {
        let cf = self.cf(cf::DOCUMENTS)?;
        self.db
            .get_cf(&cf, path.as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Every key starting with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let cf = self.cf(cf::DOCUMENTS)?;
        let iter = self.db.iterator_cf(
            &cf,
            IteratorMode::From(prefix.as_bytes(), ScanDirection::Forward),
        );

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            let key = String::from_utf8(key.to_vec())
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            entries.push((key, value.to_vec()));
        }
        Ok(entries)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {e}")))
    }
}

#[async_trait::async_trait]
impl Store for RocksStore {
    async fn get(&self, path: &str) -> Result<Option<Record>> {
        keys::validate_document_path(path)?;
        self.read(path)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        query.validate()?;

        let prefix = format!("{}/", query.collection);
        let mut matched = Vec::new();
        for (path, value) in self.scan_prefix(&prefix)? {
            if !keys::is_direct_child(&query.collection, &path) {
                continue;
            }
            let data = Self::deserialize(&value)?;
            if query.matches(&data) {
                matched.push(Document { path, data });
            }
        }

        Ok(query.finish(matched))
    }

    async fn set(&self, path: &str, record: Record) -> Result<()> {
        keys::validate_document_path(path)?;
        let cf = self.cf(cf::DOCUMENTS)?;
        let value = Self::serialize(&record)?;

        let _guard = self.lock()?;
        self.db
            .put_cf(&cf, path.as_bytes(), value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn update(&self, path: &str, ops: Vec<(String, FieldOp)>) -> Result<()> {
        keys::validate_document_path(path)?;
        let cf = self.cf(cf::DOCUMENTS)?;

        let _guard = self.lock()?;
        let mut record = self.read(path)?.ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;
        apply_field_ops(&mut record, &ops);

        let value = Self::serialize(&record)?;
        self.db
            .put_cf(&cf, path.as_bytes(), value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        keys::validate_document_path(path)?;
        let cf = self.cf(cf::DOCUMENTS)?;

        let _guard = self.lock()?;
        self.db
            .delete_cf(&cf, path.as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn recursive_delete(&self, path: &str) -> Result<usize> {
        keys::validate_document_path(path)?;
        let cf = self.cf(cf::DOCUMENTS)?;

        let mut targets: Vec<String> = self
            .scan_prefix(&format!("{path}/"))?
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        if self.read(path)?.is_some() {
            targets.push(path.to_string());
        }
        keys::sort_deepest_first(&mut targets);

        let mut removed = 0;
        // One write batch per chunk: each chunk lands atomically, the whole
        // subtree does not.
        for chunk in targets.chunks(self.delete_batch_size) {
            let mut batch = WriteBatch::default();
            for key in chunk {
                batch.delete_cf(&cf, key.as_bytes());
            }
            {
                let _guard = self.lock()?;
                self.db.write(batch).map_err(|e| {
                    tracing::warn!(path, removed, error = %e, "Recursive delete interrupted");
                    StoreError::Database(e.to_string())
                })?;
            }
            removed += chunk.len();
            tracing::debug!(path, removed, "Recursive delete batch committed");
        }

        Ok(removed)
    }
}
