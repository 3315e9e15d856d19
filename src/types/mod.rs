//! Shared types for prayertexter

pub mod error;
pub mod message;

pub use error::{RelayError, Result};
pub use message::TextMessage;
