//! Prayer lifecycle store
//!
//! Active prayers (one per intercessor) and the queue of prayers waiting for
//! an intercessor.
//!
//! ```text
//! queued ──(later allocation)──▶ active ──("prayed")──▶ deleted
//!    ▲                             │
//!    └──(intercessor cancels)──────┘
//! ```

use std::sync::Arc;
use tracing::info;

use crate::db::schemas::{Prayer, PrayerSpace};
use crate::db::{Collection, Store};
use crate::services::IdGenerator;
use crate::types::Result;

/// Active and queued prayer storage
#[derive(Clone)]
pub struct PrayerStore {
    active: Collection<Prayer>,
    queued: Collection<Prayer>,
}

impl PrayerStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            active: Collection::new(Arc::clone(&store), PrayerSpace::Active.table()),
            queued: Collection::new(store, PrayerSpace::Queued.table()),
        }
    }

    fn space(&self, space: PrayerSpace) -> &Collection<Prayer> {
        match space {
            PrayerSpace::Active => &self.active,
            PrayerSpace::Queued => &self.queued,
        }
    }

    pub async fn put(&self, prayer: &Prayer, space: PrayerSpace) -> Result<()> {
        self.space(space).save(prayer).await
    }

    pub async fn get(&self, key: &str, space: PrayerSpace) -> Result<Option<Prayer>> {
        self.space(space).find(key).await
    }

    /// Delete a prayer; absent keys are a no-op
    pub async fn delete(&self, key: &str, space: PrayerSpace) -> Result<()> {
        self.space(space).remove(key).await
    }

    /// Whether the intercessor currently holds an active prayer
    pub async fn is_active(&self, intercessor_phone: &str) -> Result<bool> {
        self.active.exists(intercessor_phone).await
    }

    /// Move the intercessor's active prayer, if any, back to the queue.
    ///
    /// Returns the queued id when a prayer was moved.
    pub async fn requeue(
        &self,
        intercessor_phone: &str,
        ids: &dyn IdGenerator,
    ) -> Result<Option<String>> {
        let Some(prayer) = self.get(intercessor_phone, PrayerSpace::Active).await? else {
            return Ok(None);
        };

        self.delete(intercessor_phone, PrayerSpace::Active).await?;

        let id = ids.new_id();
        let queued = prayer.into_queued(id.clone());
        self.put(&queued, PrayerSpace::Queued).await?;

        info!(
            intercessor = intercessor_phone,
            queued_id = %id,
            "active prayer moved back to queue"
        );
        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{Member, ACTIVE_PRAYER_TABLE, QUEUED_PRAYER_TABLE};
    use crate::db::MemoryStore;
    use crate::services::SequentialIds;

    fn prayers() -> (Arc<MemoryStore>, PrayerStore) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), PrayerStore::new(store))
    }

    fn active_prayer() -> Prayer {
        Prayer::assigned(
            Member::unregistered("111"),
            Member::unregistered("999"),
            "guidance",
        )
    }

    #[tokio::test]
    async fn test_spaces_are_separate() {
        let (_, prayers) = prayers();
        prayers
            .put(&active_prayer(), PrayerSpace::Active)
            .await
            .unwrap();

        assert!(prayers.is_active("111").await.unwrap());
        assert!(prayers
            .get("111", PrayerSpace::Queued)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_absent_prayer() {
        let (_, prayers) = prayers();
        tokio_test::assert_ok!(prayers.delete("111", PrayerSpace::Active).await);
        assert!(!prayers.is_active("111").await.unwrap());
    }

    #[tokio::test]
    async fn test_requeue_moves_prayer() {
        let (store, prayers) = prayers();
        prayers
            .put(&active_prayer(), PrayerSpace::Active)
            .await
            .unwrap();

        let id = prayers
            .requeue("111", &SequentialIds::new("q"))
            .await
            .unwrap();
        assert_eq!(id.as_deref(), Some("q-1"));

        assert_eq!(store.count(&ACTIVE_PRAYER_TABLE), 0);
        assert_eq!(store.count(&QUEUED_PRAYER_TABLE), 1);

        let queued = prayers.get("q-1", PrayerSpace::Queued).await.unwrap().unwrap();
        assert_eq!(queued.request, "guidance");
        assert_eq!(queued.requestor.phone, "999");
        assert_eq!(queued.intercessor, Member::default());
    }

    #[tokio::test]
    async fn test_requeue_without_active_prayer() {
        let (store, prayers) = prayers();
        let id = prayers
            .requeue("111", &SequentialIds::new("q"))
            .await
            .unwrap();
        assert!(id.is_none());
        assert_eq!(store.count(&QUEUED_PRAYER_TABLE), 0);
    }
}
