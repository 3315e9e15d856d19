//! Configuration for Prayer Texter
//!
//! CLI arguments and environment variable handling using clap.

use chrono::Duration;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::relay::allocation::DEFAULT_INTERCESSORS_PER_PRAYER;
use crate::relay::tracker::DEFAULT_STATE_RETENTION_HOURS;
use crate::relay::RelayConfig;
use crate::services::WordListScanner;
use crate::types::{RelayError, Result};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable lines
    Text,
    /// One JSON object per event
    Json,
}

/// Prayer Texter - text-message prayer relay
///
/// Reads one JSON message per line from stdin.
#[derive(Parser, Debug, Clone)]
#[command(name = "prayertexter")]
#[command(about = "Relays prayer requests sent by text to volunteer intercessors")]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Number of messages processed concurrently
    #[arg(long, env = "WORKER_COUNT", default_value = "1")]
    pub worker_count: usize,

    /// Intercessors sought for each prayer request
    #[arg(long, env = "INTERCESSORS_PER_PRAYER", default_value_t = DEFAULT_INTERCESSORS_PER_PRAYER)]
    pub intercessors_per_prayer: usize,

    /// Hours a completed message state is kept for redelivery detection
    #[arg(long, env = "STATE_RETENTION_HOURS", default_value_t = DEFAULT_STATE_RETENTION_HOURS)]
    pub state_retention_hours: i64,

    /// Newline-separated profanity word list (built-in list when unset)
    #[arg(long, env = "PROFANITY_LIST")]
    pub profanity_list: Option<PathBuf>,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.worker_count == 0 {
            return Err("WORKER_COUNT must be at least 1".to_string());
        }

        if self.intercessors_per_prayer == 0 {
            return Err("INTERCESSORS_PER_PRAYER must be at least 1".to_string());
        }

        if self.state_retention_hours < 0 {
            return Err("STATE_RETENTION_HOURS must not be negative".to_string());
        }

        if let Some(path) = &self.profanity_list {
            if !path.exists() {
                return Err(format!(
                    "PROFANITY_LIST file not found: {}",
                    path.display()
                ));
            }
        }

        Ok(())
    }

    /// Relay settings derived from the arguments
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            intercessors_per_prayer: self.intercessors_per_prayer,
            state_retention: Duration::hours(self.state_retention_hours),
        }
    }

    /// Profanity scanner from the configured word list, or the built-in one
    pub fn scanner(&self) -> Result<WordListScanner> {
        match &self.profanity_list {
            Some(path) => WordListScanner::from_file(path).map_err(|e| {
                RelayError::Config(format!("cannot read {}: {}", path.display(), e))
            }),
            None => Ok(WordListScanner::default()),
        }
    }
}
