//! Allocation engine
//!
//! Picks intercessors for a prayer request. Candidates are drawn at random
//! from the pool (minus the requestor) in batches; each candidate is skipped
//! if it already holds an active prayer or has used up its weekly quota.
//! Quota weeks reset lazily, only when the intercessor is drawn.
//!
//! Counter updates are persisted as each intercessor is chosen. A storage
//! failure part way through leaves earlier updates in place.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::directory::MemberDirectory;
use super::pool::PoolService;
use super::prayers::PrayerStore;
use crate::db::schemas::Member;
use crate::types::{RelayError, Result};

/// Intercessors sought for each request
pub const DEFAULT_INTERCESSORS_PER_PRAYER: usize = 2;

/// Length of a quota week
pub const QUOTA_WINDOW_HOURS: i64 = 7 * 24;

/// What the quota rules allow for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// Under quota: assign and count one more prayer
    Assign,
    /// At quota but the week has passed: start a new week and assign
    ResetAndAssign,
    /// At quota within the current week
    Exhausted,
}

/// Apply the weekly quota rules to `member` at `now`.
///
/// A member at quota with no recorded week start is treated as having an
/// elapsed week.
pub fn evaluate_quota(member: &Member, now: DateTime<Utc>) -> QuotaDecision {
    if member.prayer_count < member.weekly_prayer_limit {
        return QuotaDecision::Assign;
    }

    match member.weekly_prayer_date {
        Some(anchor) if now - anchor <= Duration::hours(QUOTA_WINDOW_HOURS) => {
            QuotaDecision::Exhausted
        }
        _ => QuotaDecision::ResetAndAssign,
    }
}

impl QuotaDecision {
    /// Update the member's counters for this decision. Returns whether the
    /// member was assigned.
    pub fn apply(self, member: &mut Member, now: DateTime<Utc>) -> bool {
        match self {
            Self::Assign => {
                member.prayer_count += 1;
                true
            }
            Self::ResetAndAssign => {
                member.prayer_count = 1;
                member.weekly_prayer_date = Some(now);
                true
            }
            Self::Exhausted => false,
        }
    }
}

/// Result of an allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// One or more intercessors, counters already persisted
    Assigned(Vec<Member>),
    /// Nobody can take the request right now
    NoneAvailable,
}

/// Intercessor allocation engine
#[derive(Clone)]
pub struct Allocator {
    directory: MemberDirectory,
    pool: PoolService,
    prayers: PrayerStore,
    per_prayer: usize,
}

impl Allocator {
    pub fn new(
        directory: MemberDirectory,
        pool: PoolService,
        prayers: PrayerStore,
        per_prayer: usize,
    ) -> Self {
        Self {
            directory,
            pool,
            prayers,
            per_prayer,
        }
    }

    /// Select up to `per_prayer` intercessors for a request from `requestor_phone`
    pub async fn allocate(&self, requestor_phone: &str, now: DateTime<Utc>) -> Result<Allocation> {
        let mut remaining = self.pool.get().await?;
        remaining.remove(requestor_phone);

        let mut chosen: Vec<Member> = Vec::with_capacity(self.per_prayer);

        while chosen.len() < self.per_prayer {
            let batch = match remaining.draw_candidates(self.per_prayer - chosen.len()) {
                Ok(batch) => batch,
                Err(RelayError::PoolEmpty) => break,
                Err(e) => return Err(e),
            };

            for phone in batch {
                remaining.remove(&phone);

                let mut candidate = self.directory.get(&phone).await?;
                if !candidate.is_registered() {
                    warn!(phone = %phone, "pool phone has no member record, skipping");
                    continue;
                }

                if self.prayers.is_active(&phone).await? {
                    debug!(phone = %phone, "intercessor already has an active prayer");
                    continue;
                }

                let decision = evaluate_quota(&candidate, now);
                if !decision.apply(&mut candidate, now) {
                    debug!(
                        phone = %phone,
                        count = candidate.prayer_count,
                        limit = candidate.weekly_prayer_limit,
                        "intercessor at weekly quota"
                    );
                    continue;
                }

                self.directory.put(&candidate).await?;
                debug!(phone = %phone, ?decision, count = candidate.prayer_count, "intercessor selected");
                chosen.push(candidate);
            }
        }

        if chosen.is_empty() {
            info!(requestor = requestor_phone, "no intercessors available");
            return Ok(Allocation::NoneAvailable);
        }

        if chosen.len() < self.per_prayer {
            info!(
                requestor = requestor_phone,
                found = chosen.len(),
                wanted = self.per_prayer,
                "fewer intercessors available than wanted"
            );
        }

        Ok(Allocation::Assigned(chosen))
    }
}
