//! Intercessor pool service
//!
//! Persisted read-modify-write operations on the singleton pool record.

use std::sync::Arc;
use tracing::{info, warn};

use crate::db::schemas::{IntercessorPool, GENERAL_TABLE, INTERCESSOR_POOL_KEY};
use crate::db::{Collection, Store};
use crate::types::Result;

/// Access to the intercessor pool record
#[derive(Clone)]
pub struct PoolService {
    collection: Collection<IntercessorPool>,
}

impl PoolService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            collection: Collection::new(store, GENERAL_TABLE),
        }
    }

    /// Load the pool; an absent record is an empty pool
    pub async fn get(&self) -> Result<IntercessorPool> {
        let mut pool = self.collection.find_or_default(INTERCESSOR_POOL_KEY).await?;
        let stored = pool.len();
        pool.dedup();
        if pool.len() != stored {
            warn!(
                removed = stored - pool.len(),
                "intercessor pool held duplicate phones"
            );
        }
        Ok(pool)
    }

    pub async fn put(&self, pool: &IntercessorPool) -> Result<()> {
        let mut pool = pool.clone();
        pool.name = INTERCESSOR_POOL_KEY.to_string();
        self.collection.save(&pool).await
    }

    /// Add a phone to the persisted pool
    pub async fn register(&self, phone: &str) -> Result<()> {
        let mut pool = self.get().await?;
        if pool.add(phone) {
            self.put(&pool).await?;
            info!(phone, size = pool.len(), "intercessor added to pool");
        }
        Ok(())
    }

    /// Remove a phone from the persisted pool; absent phones are a no-op
    pub async fn deregister(&self, phone: &str) -> Result<()> {
        let mut pool = self.get().await?;
        if pool.remove(phone) {
            self.put(&pool).await?;
            info!(phone, size = pool.len(), "intercessor removed from pool");
        }
        Ok(())
    }
}
