//! Member directory
//!
//! Per-phone member records. Lookups never fail on a missing record; they
//! return the zero-value member for that phone instead.

use std::sync::Arc;
use tracing::debug;

use crate::db::schemas::{Member, MEMBER_TABLE};
use crate::db::{Collection, Store};
use crate::types::Result;

/// Member directory backed by the members table
#[derive(Clone)]
pub struct MemberDirectory {
    collection: Collection<Member>,
}

impl MemberDirectory {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            collection: Collection::new(store, MEMBER_TABLE),
        }
    }

    /// Get a member, or an unregistered member carrying `phone` if absent
    pub async fn get(&self, phone: &str) -> Result<Member> {
        match self.collection.find(phone).await? {
            Some(member) => Ok(member),
            None => {
                debug!(phone, "no member record");
                Ok(Member::unregistered(phone))
            }
        }
    }

    /// Insert or fully replace a member
    pub async fn put(&self, member: &Member) -> Result<()> {
        self.collection.save(member).await
    }

    /// Delete a member; deleting an absent member is a no-op
    pub async fn delete(&self, phone: &str) -> Result<()> {
        self.collection.remove(phone).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{SignUpStage, SignUpStatus};
    use crate::db::MemoryStore;
    use chrono::Utc;

    fn directory() -> (Arc<MemoryStore>, MemberDirectory) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), MemberDirectory::new(store))
    }

    #[tokio::test]
    async fn test_absent_member_is_zero_value() {
        let (_, directory) = directory();
        let member = directory.get("555").await.unwrap();
        assert_eq!(member, Member::unregistered("555"));
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (_, directory) = directory();
        let member = Member {
            phone: "555".into(),
            name: "Hannah".into(),
            intercessor: true,
            setup_stage: SignUpStage::Complete,
            setup_status: SignUpStatus::Completed,
            weekly_prayer_limit: 3,
            prayer_count: 1,
            weekly_prayer_date: Some(Utc::now()),
        };

        directory.put(&member).await.unwrap();
        assert_eq!(directory.get("555").await.unwrap(), member);
    }

    #[tokio::test]
    async fn test_put_replaces_whole_record() {
        let (store, directory) = directory();
        let mut member = Member::unregistered("555");
        member.name = "Eli".into();
        member.prayer_count = 4;
        directory.put(&member).await.unwrap();

        let replacement = Member::unregistered("555");
        directory.put(&replacement).await.unwrap();

        assert_eq!(directory.get("555").await.unwrap(), replacement);
        assert_eq!(store.count(&MEMBER_TABLE), 1);
    }

    #[tokio::test]
    async fn test_delete_absent_member() {
        let (_, directory) = directory();
        tokio_test::assert_ok!(directory.delete("nobody").await);
    }
}
