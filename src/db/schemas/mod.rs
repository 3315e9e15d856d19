//! Record schemas for prayertexter
//!
//! Defines the documents for members, the intercessor pool, prayers and the
//! state tracker, plus the tables they live in.

mod intercessors;
mod member;
mod prayer;
mod state;

pub use intercessors::{IntercessorPool, INTERCESSOR_POOL_KEY};
pub use member::{Member, SignUpStage, SignUpStatus, MEMBER_TABLE};
pub use prayer::{Prayer, PrayerSpace, ACTIVE_PRAYER_TABLE, QUEUED_PRAYER_TABLE};
pub use state::{State, StateStatus, StateTracker, STATE_TRACKER_KEY};

use crate::db::Table;

/// Table holding the singleton records (intercessor pool, state tracker)
pub const GENERAL_TABLE: Table = Table::new("General", "Name");
