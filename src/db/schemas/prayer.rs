//! Prayer document schema
//!
//! Active prayers are keyed by the assigned intercessor's phone, so an
//! intercessor can hold at most one. Queued prayers have no intercessor and
//! are keyed by a generated id stored in the same attribute.

use serde::{Deserialize, Serialize};

use super::member::Member;
use crate::db::Table;

/// Prayers currently assigned to an intercessor
pub const ACTIVE_PRAYER_TABLE: Table = Table::new("ActivePrayers", "IntercessorPhone");

/// Prayers waiting for an intercessor
pub const QUEUED_PRAYER_TABLE: Table = Table::new("QueuedPrayers", "IntercessorPhone");

/// Which prayer space a record lives in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrayerSpace {
    Active,
    Queued,
}

impl PrayerSpace {
    pub fn table(self) -> Table {
        match self {
            Self::Active => ACTIVE_PRAYER_TABLE,
            Self::Queued => QUEUED_PRAYER_TABLE,
        }
    }
}

/// Prayer document
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Prayer {
    /// Snapshot of the assigned intercessor (zero value when queued)
    #[serde(default)]
    pub intercessor: Member,

    /// Record key: intercessor phone when active, generated id when queued
    pub intercessor_phone: String,

    /// Request text as sent by the requestor
    #[serde(default)]
    pub request: String,

    /// Snapshot of the requestor
    #[serde(default)]
    pub requestor: Member,
}

impl Prayer {
    /// Prayer assigned to `intercessor`
    pub fn assigned(intercessor: Member, requestor: Member, request: impl Into<String>) -> Self {
        Self {
            intercessor_phone: intercessor.phone.clone(),
            intercessor,
            request: request.into(),
            requestor,
        }
    }

    /// Prayer waiting for an intercessor, stored under `id`
    pub fn queued(id: impl Into<String>, requestor: Member, request: impl Into<String>) -> Self {
        Self {
            intercessor: Member::default(),
            intercessor_phone: id.into(),
            request: request.into(),
            requestor,
        }
    }

    /// Detach from the current intercessor and re-key under `id`
    pub fn into_queued(self, id: impl Into<String>) -> Self {
        Self::queued(id, self.requestor, self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_queued_clears_intercessor() {
        let intercessor = Member::unregistered("111");
        let requestor = Member::unregistered("222");
        let prayer = Prayer::assigned(intercessor, requestor.clone(), "healing");
        assert_eq!(prayer.intercessor_phone, "111");

        let queued = prayer.into_queued("q-1");
        assert_eq!(queued.intercessor_phone, "q-1");
        assert_eq!(queued.intercessor, Member::default());
        assert_eq!(queued.requestor, requestor);
        assert_eq!(queued.request, "healing");
    }

    #[test]
    fn test_nested_members_in_document() {
        let prayer = Prayer::assigned(
            Member::unregistered("111"),
            Member::unregistered("222"),
            "peace",
        );
        let doc = bson::to_document(&prayer).unwrap();
        assert_eq!(doc.get_str("IntercessorPhone").unwrap(), "111");
        assert_eq!(
            doc.get_document("Requestor").unwrap().get_str("Phone").unwrap(),
            "222"
        );
    }
}
