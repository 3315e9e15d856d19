//! In-memory store
//!
//! DashMap-backed [`Store`] for development runs and tests. Contents are lost
//! when the process exits.

use bson::Document;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use super::store::{Store, Table};
use crate::types::{RelayError, Result};

/// Per-operation call counters
#[derive(Debug, Default)]
struct OpCounts {
    puts: AtomicUsize,
    deletes: AtomicUsize,
}

/// In-memory store indexed by (table, key)
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<(&'static str, String), Document>,
    /// Tables whose operations fail, for exercising error paths
    failing: DashSet<&'static str>,
    counts: OpCounts,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation on `table` fail with a database error
    pub fn fail_table(&self, table: &Table) {
        self.failing.insert(table.name);
    }

    /// Undo [`MemoryStore::fail_table`]
    pub fn heal_table(&self, table: &Table) {
        self.failing.remove(table.name);
    }

    /// Number of records currently stored in `table`
    pub fn count(&self, table: &Table) -> usize {
        self.records
            .iter()
            .filter(|entry| entry.key().0 == table.name)
            .count()
    }

    pub fn put_count(&self) -> usize {
        self.counts.puts.load(Ordering::Relaxed)
    }

    pub fn delete_count(&self) -> usize {
        self.counts.deletes.load(Ordering::Relaxed)
    }

    fn check(&self, table: &Table, op: &str) -> Result<()> {
        if self.failing.contains(table.name) {
            return Err(RelayError::Database(format!(
                "{} on {} failed: table unavailable",
                op, table.name
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get_record(&self, table: &Table, key: &str) -> Result<Option<Document>> {
        self.check(table, "get")?;

        Ok(self
            .records
            .get(&(table.name, key.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn put_record(&self, table: &Table, record: Document) -> Result<()> {
        self.counts.puts.fetch_add(1, Ordering::Relaxed);
        self.check(table, "put")?;

        let key = record
            .get_str(table.key_attr)
            .map_err(|e| {
                RelayError::Database(format!(
                    "record for {} has no usable {} key: {}",
                    table.name, table.key_attr, e
                ))
            })?
            .to_string();

        debug!(table = table.name, key = %key, "memory store: put");
        self.records.insert((table.name, key), record);
        Ok(())
    }

    async fn delete_record(&self, table: &Table, key: &str) -> Result<()> {
        self.counts.deletes.fetch_add(1, Ordering::Relaxed);
        self.check(table, "delete")?;

        if self.records.remove(&(table.name, key.to_string())).is_some() {
            debug!(table = table.name, key = %key, "memory store: deleted");
        }
        Ok(())
    }
}
