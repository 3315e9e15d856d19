//! Member document schema
//!
//! One record per phone number: sign-up progress and, for intercessors, the
//! weekly prayer quota.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Table;

/// Table for member records, keyed by phone
pub const MEMBER_TABLE: Table = Table::new("Members", "Phone");

/// Step of the sign-up dialogue, persisted as its number
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[serde(into = "u8", try_from = "u8")]
pub enum SignUpStage {
    #[default]
    NotStarted,
    AwaitingName,
    AwaitingMemberType,
    AwaitingQuota,
    Complete,
}

impl From<SignUpStage> for u8 {
    fn from(stage: SignUpStage) -> Self {
        match stage {
            SignUpStage::NotStarted => 0,
            SignUpStage::AwaitingName => 1,
            SignUpStage::AwaitingMemberType => 2,
            SignUpStage::AwaitingQuota => 3,
            SignUpStage::Complete => 99,
        }
    }
}

impl TryFrom<u8> for SignUpStage {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NotStarted),
            1 => Ok(Self::AwaitingName),
            2 => Ok(Self::AwaitingMemberType),
            3 => Ok(Self::AwaitingQuota),
            99 => Ok(Self::Complete),
            other => Err(format!("unknown sign-up stage {}", other)),
        }
    }
}

/// Overall sign-up status
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignUpStatus {
    /// Never started, or no record at all
    #[default]
    #[serde(rename = "")]
    Unregistered,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

/// Member document
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Member {
    /// Phone number (record key)
    pub phone: String,

    #[serde(default)]
    pub name: String,

    /// Whether this member receives prayer requests
    #[serde(default)]
    pub intercessor: bool,

    #[serde(default)]
    pub setup_stage: SignUpStage,

    #[serde(default)]
    pub setup_status: SignUpStatus,

    /// Maximum prayers per rolling week
    #[serde(default)]
    pub weekly_prayer_limit: u32,

    /// Prayers received in the current week
    #[serde(default)]
    pub prayer_count: u32,

    /// Start of the current quota week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_prayer_date: Option<DateTime<Utc>>,
}

impl Member {
    /// Zero-value member for a phone with no record
    pub fn unregistered(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            ..Default::default()
        }
    }

    pub fn is_registered(&self) -> bool {
        self.setup_status != SignUpStatus::Unregistered
    }

    pub fn is_signing_up(&self) -> bool {
        self.setup_status == SignUpStatus::InProgress
    }
}
