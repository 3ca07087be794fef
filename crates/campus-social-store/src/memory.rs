//! In-memory storage implementation.
//!
//! `MemoryStore` keeps every record in a `BTreeMap` keyed by path. It is the
//! default backend for development and the backend every test runs against.
//! Faults can be injected to reproduce partial failures.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::document::{apply_field_ops, Document, FieldOp, Query, Record};
use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::DEFAULT_DELETE_BATCH_SIZE;
use crate::Store;

/// A failure to simulate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Writes to exactly this path fail.
    FailWritesAt(String),
    /// Writes to this path or anything beneath it fail.
    FailWritesUnder(String),
    /// Every read fails.
    FailReads,
    /// The next recursive delete fails after removing this many records.
    /// Consumed when it fires.
    FailDeleteAfter(usize),
}

/// In-memory document store.
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, Record>>,
    faults: Mutex<Vec<Fault>>,
    delete_batch_size: usize,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_delete_batch_size(DEFAULT_DELETE_BATCH_SIZE)
    }

    /// Create an empty store that deletes `batch_size` records per batch.
    #[must_use]
    pub fn with_delete_batch_size(batch_size: usize) -> Self {
        Self {
            docs: Mutex::new(BTreeMap::new()),
            faults: Mutex::new(Vec::new()),
            delete_batch_size: batch_size.max(1),
        }
    }

    /// Install a fault.
    pub fn inject_fault(&self, fault: Fault) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.push(fault);
        }
    }

    /// Remove every installed fault.
    pub fn clear_faults(&self) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.clear();
        }
    }

    /// Number of records currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.lock().map_or(0, |docs| docs.len())
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records at or beneath `root`.
    #[must_use]
    pub fn count_within(&self, root: &str) -> usize {
        self.docs.lock().map_or(0, |docs| {
            docs.keys().filter(|path| keys::is_within(root, path)).count()
        })
    }

    fn docs(&self) -> Result<MutexGuard<'_, BTreeMap<String, Record>>> {
        self.docs
            .lock()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {e}")))
    }

    fn check_read(&self) -> Result<()> {
        let faults = self
            .faults
            .lock()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {e}")))?;
        if faults.contains(&Fault::FailReads) {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        Ok(())
    }

    fn check_write(&self, path: &str) -> Result<()> {
        let faults = self
            .faults
            .lock()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {e}")))?;
        let blocked = faults.iter().any(|fault| match fault {
            Fault::FailWritesAt(target) => target == path,
            Fault::FailWritesUnder(root) => keys::is_within(root, path),
            Fault::FailReads | Fault::FailDeleteAfter(_) => false,
        });
        if blocked {
            return Err(StoreError::Unavailable(format!(
                "injected write failure: {path}"
            )));
        }
        Ok(())
    }

    /// Take the pending delete budget, if one is installed.
    fn take_delete_budget(&self) -> Result<Option<usize>> {
        let mut faults = self
            .faults
            .lock()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {e}")))?;
        let position = faults
            .iter()
            .position(|fault| matches!(fault, Fault::FailDeleteAfter(_)));
        Ok(position.and_then(|i| match faults.remove(i) {
            Fault::FailDeleteAfter(n) => Some(n),
            _ => None,
        }))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Record>> {
        keys::validate_document_path(path)?;
        self.check_read()?;
        Ok(self.docs()?.get(path).cloned())
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        query.validate()?;
        self.check_read()?;

        let docs = self.docs()?;
        let prefix = format!("{}/", query.collection);
        let matched: Vec<Document> = docs
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter(|(path, record)| {
                keys::is_direct_child(&query.collection, path) && query.matches(record)
            })
            .map(|(path, record)| Document {
                path: path.clone(),
                data: record.clone(),
            })
            .collect();

        Ok(query.finish(matched))
    }

    async fn set(&self, path: &str, record: Record) -> Result<()> {
        keys::validate_document_path(path)?;
        self.check_write(path)?;
        self.docs()?.insert(path.to_string(), record);
        Ok(())
    }

    async fn update(&self, path: &str, ops: Vec<(String, FieldOp)>) -> Result<()> {
        keys::validate_document_path(path)?;
        self.check_write(path)?;

        let mut docs = self.docs()?;
        let record = docs.get_mut(path).ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;
        apply_field_ops(record, &ops);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        keys::validate_document_path(path)?;
        self.check_write(path)?;
        self.docs()?.remove(path);
        Ok(())
    }

    async fn recursive_delete(&self, path: &str) -> Result<usize> {
        keys::validate_document_path(path)?;

        let mut targets: Vec<String> = {
            let docs = self.docs()?;
            docs.range(path.to_string()..)
                .map(|(key, _)| key)
                .take_while(|key| key.starts_with(path))
                .filter(|key| keys::is_within(path, key))
                .cloned()
                .collect()
        };
        keys::sort_deepest_first(&mut targets);

        let mut budget = self.take_delete_budget()?;
        let mut removed = 0;

        for batch in targets.chunks(self.delete_batch_size) {
            for key in batch {
                if budget == Some(0) {
                    tracing::warn!(path, removed, "Recursive delete interrupted");
                    return Err(StoreError::Unavailable(format!(
                        "recursive delete interrupted after {removed} records"
                    )));
                }
                self.check_write(key)?;
                if self.docs()?.remove(key).is_some() {
                    removed += 1;
                    budget = budget.map(|n| n - 1);
                }
            }
            tracing::debug!(path, removed, "Recursive delete batch committed");
            tokio::task::yield_now().await;
        }

        Ok(removed)
    }
}
