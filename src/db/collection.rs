//! Typed collection over a [`Store`]
//!
//! Converts between schema structs and BSON documents so services work with
//! `Member`, `Prayer` and friends rather than raw records.

use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::error;

use super::store::{Store, Table};
use crate::types::Result;

/// Typed view of one table
pub struct Collection<T> {
    store: Arc<dyn Store>,
    table: Table,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            table: self.table,
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(store: Arc<dyn Store>, table: Table) -> Self {
        Self {
            store,
            table,
            _marker: PhantomData,
        }
    }

    /// Find one record by key
    pub async fn find(&self, key: &str) -> Result<Option<T>> {
        match self.store.get_record(&self.table, key).await? {
            Some(doc) => {
                let item = bson::from_document(doc).map_err(|e| {
                    error!(table = self.table.name, key, "failed to decode record: {}", e);
                    e
                })?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    /// Find one record by key, falling back to the zero value when absent
    pub async fn find_or_default(&self, key: &str) -> Result<T> {
        Ok(self.find(key).await?.unwrap_or_default())
    }

    /// Insert or fully replace a record
    pub async fn save(&self, item: &T) -> Result<()> {
        let doc = bson::to_document(item)?;
        self.store.put_record(&self.table, doc).await
    }

    /// Delete a record by key; absent keys are not an error
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.store.delete_record(&self.table, key).await
    }

    /// Whether a record exists under `key`
    pub async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.store.get_record(&self.table, key).await?.is_some())
    }
}
