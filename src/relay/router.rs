//! Message router
//!
//! Entry point for one inbound message: opens a state, classifies the message,
//! runs the matching flow and closes the state. Failures are recorded on the
//! state and returned so the delivery layer can redeliver.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::allocation::{Allocation, Allocator, DEFAULT_INTERCESSORS_PER_PRAYER};
use super::dialogue::{self, Route};
use super::directory::MemberDirectory;
use super::messages;
use super::pool::PoolService;
use super::prayers::PrayerStore;
use super::tracker::{StateTrackerService, DEFAULT_STATE_RETENTION_HOURS};
use crate::db::schemas::{Member, Prayer, PrayerSpace, State, StateStatus};
use crate::db::Store;
use crate::services::{IdGenerator, ProfanityScanner, TextSender};
use crate::types::{RelayError, Result, TextMessage};

/// Relay tuning
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Intercessors sought for each prayer request
    pub intercessors_per_prayer: usize,
    /// How long completed states are kept for duplicate detection
    pub state_retention: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            intercessors_per_prayer: DEFAULT_INTERCESSORS_PER_PRAYER,
            state_retention: Duration::hours(DEFAULT_STATE_RETENTION_HOURS),
        }
    }
}

/// What happened to an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Processed through the given flow
    Handled(Route),
    /// Already completed on an earlier delivery; nothing was done
    Duplicate,
}

/// Prayer relay
pub struct Relay {
    directory: MemberDirectory,
    pool: PoolService,
    prayers: PrayerStore,
    allocator: Allocator,
    tracker: StateTrackerService,
    sender: Arc<dyn TextSender>,
    scanner: Arc<dyn ProfanityScanner>,
    ids: Arc<dyn IdGenerator>,
}

impl Relay {
    pub fn new(
        store: Arc<dyn Store>,
        sender: Arc<dyn TextSender>,
        scanner: Arc<dyn ProfanityScanner>,
        ids: Arc<dyn IdGenerator>,
        config: RelayConfig,
    ) -> Self {
        let directory = MemberDirectory::new(Arc::clone(&store));
        let pool = PoolService::new(Arc::clone(&store));
        let prayers = PrayerStore::new(Arc::clone(&store));
        let allocator = Allocator::new(
            directory.clone(),
            pool.clone(),
            prayers.clone(),
            config.intercessors_per_prayer,
        );
        let tracker = StateTrackerService::new(store, config.state_retention);

        Self {
            directory,
            pool,
            prayers,
            allocator,
            tracker,
            sender,
            scanner,
            ids,
        }
    }

    /// Process one inbound message
    pub async fn handle(&self, mut message: TextMessage) -> Result<Outcome> {
        if message.request_id.is_empty() {
            message.request_id = self.ids.new_id();
            warn!(
                phone = %message.phone,
                id = %message.request_id,
                "message has no request id, redeliveries will not be detected"
            );
        } else if let Some(previous) = self.tracker.lookup(&message.request_id).await? {
            if previous.status == StateStatus::Completed {
                info!(id = %message.request_id, "message already processed, skipping");
                return Ok(Outcome::Duplicate);
            }
            info!(
                id = %message.request_id,
                status = ?previous.status,
                "reprocessing redelivered message"
            );
        }

        let now = Utc::now();
        let mut state = self.tracker.open(&message, now).await?;

        let member = match self.directory.get(&message.phone).await {
            Ok(member) => member,
            Err(e) => return Err(self.record_failure(&mut state, e).await),
        };

        let route = dialogue::classify(&message, &member);
        if let Err(e) = self
            .tracker
            .update_stage(&mut state, route.stage_label())
            .await
        {
            return Err(self.record_failure(&mut state, e).await);
        }

        if let Err(e) = self.dispatch(route, &message, member, now).await {
            return Err(self.record_failure(&mut state, e).await);
        }

        if let Err(e) = self.tracker.complete(&mut state).await {
            return Err(self.record_failure(&mut state, e).await);
        }
        Ok(Outcome::Handled(route))
    }

    async fn record_failure(&self, state: &mut State, err: RelayError) -> RelayError {
        error!(id = %state.id, stage = %state.stage, "processing failed: {}", err);
        if let Err(track_err) = self.tracker.fail(state, &err.to_string()).await {
            error!(id = %state.id, "could not record failure: {}", track_err);
        }
        err
    }

    async fn dispatch(
        &self,
        route: Route,
        message: &TextMessage,
        member: Member,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match route {
            Route::Help => self.sender.send(&member.phone, messages::HELP).await,
            Route::Cancel => self.cancel(member).await,
            Route::SignUp => self.sign_up(member, &message.body, now).await,
            Route::Drop => {
                warn!(phone = %member.phone, "non registered user, dropping message");
                Ok(())
            }
            Route::CompletePrayer => self.complete_prayer(member).await,
            Route::PrayerRequest => self.prayer_request(member, &message.body, now).await,
        }
    }

    async fn sign_up(&self, member: Member, body: &str, now: DateTime<Utc>) -> Result<()> {
        let step = dialogue::signup_step(&member, body, now);

        if step.is_wrong_input() {
            warn!(phone = %member.phone, stage = ?member.setup_stage, "wrong input received during sign up");
        }

        if step.join_pool {
            self.pool.register(&member.phone).await?;
        }

        if step.leave_pool {
            self.pool.deregister(&member.phone).await?;
        }

        if let Some(updated) = &step.update {
            self.directory.put(updated).await?;
            info!(phone = %updated.phone, stage = ?updated.setup_stage, "sign up advanced");
        }

        self.sender.send(&member.phone, &step.reply).await
    }

    async fn cancel(&self, member: Member) -> Result<()> {
        self.directory.delete(&member.phone).await?;

        // cleanup does not depend on the intercessor flag, which a re-sign-up
        // can clear while the phone still holds an assignment
        self.pool.deregister(&member.phone).await?;
        self.prayers
            .requeue(&member.phone, self.ids.as_ref())
            .await?;

        info!(phone = %member.phone, intercessor = member.intercessor, "member removed");
        self.sender.send(&member.phone, messages::REMOVE_USER).await
    }

    async fn prayer_request(&self, member: Member, body: &str, now: DateTime<Utc>) -> Result<()> {
        if let Some(term) = self.scanner.scan(body) {
            warn!(phone = %member.phone, "profanity found in prayer request");
            return self
                .sender
                .send(&member.phone, &messages::profanity_found(&term))
                .await;
        }

        let intercessors = match self.allocator.allocate(&member.phone, now).await? {
            Allocation::Assigned(intercessors) => intercessors,
            Allocation::NoneAvailable => return self.queue_prayer(member, body).await,
        };

        for intercessor in intercessors {
            let phone = intercessor.phone.clone();
            let prayer = Prayer::assigned(intercessor, member.clone(), body);
            self.prayers.put(&prayer, PrayerSpace::Active).await?;

            self.sender
                .send(&phone, &messages::prayer_intro(&member.name, body))
                .await?;
            info!(requestor = %member.phone, intercessor = %phone, "prayer assigned");
        }

        self.sender
            .send(&member.phone, messages::PRAYER_SENT_OUT)
            .await
    }

    async fn queue_prayer(&self, member: Member, body: &str) -> Result<()> {
        let id = self.ids.new_id();
        let prayer = Prayer::queued(id.clone(), member.clone(), body);
        self.prayers.put(&prayer, PrayerSpace::Queued).await?;
        info!(requestor = %member.phone, queued_id = %id, "prayer queued");

        self.sender
            .send(&member.phone, messages::PRAYER_QUEUED)
            .await
    }

    async fn complete_prayer(&self, member: Member) -> Result<()> {
        let Some(prayer) = self.prayers.get(&member.phone, PrayerSpace::Active).await? else {
            return self
                .sender
                .send(&member.phone, messages::NO_ACTIVE_PRAYER)
                .await;
        };

        self.sender
            .send(&member.phone, messages::PRAYER_THANK_YOU)
            .await?;
        self.sender
            .send(
                &prayer.requestor.phone,
                &messages::prayer_confirmation(&member.name),
            )
            .await?;

        self.prayers
            .delete(&member.phone, PrayerSpace::Active)
            .await?;
        info!(intercessor = %member.phone, requestor = %prayer.requestor.phone, "prayer completed");
        Ok(())
    }
}
