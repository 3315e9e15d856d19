//! Prayer Texter - text-message prayer relay
//!
//! "Pray for one another" - James 5:16
//!
//! Members sign up by text as requestors or intercessors. Prayer requests are
//! forwarded to intercessors picked at random within their weekly quotas, and
//! queued when nobody is available.
//!
//! ## Components
//!
//! - **Directory**: member records keyed by phone
//! - **Pool**: the list of intercessor phones eligible for allocation
//! - **Prayers**: active assignments and the waiting queue
//! - **Allocation**: random selection under weekly quotas
//! - **Dialogue**: message classification and the sign-up conversation
//! - **Tracker**: per-message state for redelivery detection

pub mod config;
pub mod db;
pub mod relay;
pub mod services;
pub mod types;

pub use config::Args;
pub use relay::{Outcome, Relay, RelayConfig};
pub use types::{RelayError, Result};
