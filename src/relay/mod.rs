//! Prayer relay
//!
//! Services over the record store plus the router that drives them for each
//! inbound text.

pub mod allocation;
pub mod dialogue;
pub mod directory;
pub mod messages;
pub mod pool;
pub mod prayers;
pub mod router;
pub mod tracker;

pub use allocation::{evaluate_quota, Allocation, Allocator, QuotaDecision};
pub use dialogue::{classify, signup_step, Route, SignUpStep};
pub use directory::MemberDirectory;
pub use pool::PoolService;
pub use prayers::PrayerStore;
pub use router::{Outcome, Relay, RelayConfig};
pub use tracker::StateTrackerService;
