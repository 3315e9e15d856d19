//! Dialogue state machine
//!
//! Pure decision logic: which flow a message belongs to, and how the sign-up
//! conversation advances. Nothing here touches storage or sends texts; the
//! router applies the results.
//!
//! Sign-up stages:
//!
//! | stage | input | next |
//! |---|---|---|
//! | any | `pray` | 1, ask name |
//! | 1 | `2` | 2 as "Anonymous", ask member type |
//! | 1 | anything else | 2 with that name, ask member type |
//! | 2 | `1` | 99, requestor only, leaves pool if it was an intercessor |
//! | 2 | `2` | 3, ask weekly quota |
//! | 3 | number | 99, intercessor, joins pool |
//! | otherwise | | unchanged, wrong-input reply |

use chrono::{DateTime, Utc};

use super::messages;
use crate::db::schemas::{Member, SignUpStage, SignUpStatus};
use crate::types::TextMessage;

/// Name stored for members who decline to give one
pub const ANONYMOUS: &str = "Anonymous";

/// Flow a message is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Help,
    Cancel,
    SignUp,
    Drop,
    CompletePrayer,
    PrayerRequest,
}

impl Route {
    /// Label recorded on the state tracker
    pub fn stage_label(self) -> &'static str {
        match self {
            Self::Help => "HELP",
            Self::Cancel => "MEMBER DELETE",
            Self::SignUp => "SIGN UP",
            Self::Drop => "DROP MESSAGE",
            Self::CompletePrayer => "COMPLETE PRAYER",
            Self::PrayerRequest => "PRAYER REQUEST",
        }
    }
}

/// Decide which flow handles `message` from `member`
pub fn classify(message: &TextMessage, member: &Member) -> Route {
    let keyword = message.keyword();

    match keyword.as_str() {
        "help" => Route::Help,
        "cancel" | "stop" => Route::Cancel,
        "pray" => Route::SignUp,
        _ if member.is_signing_up() => Route::SignUp,
        _ if !member.is_registered() => Route::Drop,
        "prayed" => Route::CompletePrayer,
        _ => Route::PrayerRequest,
    }
}

/// Outcome of one sign-up message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpStep {
    /// Member record to persist, `None` when nothing changes
    pub update: Option<Member>,
    /// Whether the member's phone joins the intercessor pool
    pub join_pool: bool,
    /// Whether the member's phone leaves the intercessor pool
    pub leave_pool: bool,
    /// Reply to send back
    pub reply: String,
}

impl SignUpStep {
    fn advance(member: Member, reply: impl Into<String>) -> Self {
        Self {
            update: Some(member),
            join_pool: false,
            leave_pool: false,
            reply: reply.into(),
        }
    }

    fn wrong_input() -> Self {
        Self {
            update: None,
            join_pool: false,
            leave_pool: false,
            reply: messages::WRONG_INPUT.to_string(),
        }
    }

    /// Whether the input was rejected
    pub fn is_wrong_input(&self) -> bool {
        self.update.is_none()
    }
}

/// Advance the sign-up conversation for `member` given message `body`
pub fn signup_step(member: &Member, body: &str, now: DateTime<Utc>) -> SignUpStep {
    let input = body.trim();
    let mut next = member.clone();

    if input.eq_ignore_ascii_case("pray") {
        next.setup_status = SignUpStatus::InProgress;
        next.setup_stage = SignUpStage::AwaitingName;
        return SignUpStep::advance(next, messages::NAME_REQUEST);
    }

    match (member.setup_stage, input) {
        (SignUpStage::AwaitingName, "2") => {
            next.name = ANONYMOUS.to_string();
            next.setup_stage = SignUpStage::AwaitingMemberType;
            SignUpStep::advance(next, messages::MEMBER_TYPE_REQUEST)
        }
        (SignUpStage::AwaitingName, _) => {
            next.name = input.to_string();
            next.setup_stage = SignUpStage::AwaitingMemberType;
            SignUpStep::advance(next, messages::MEMBER_TYPE_REQUEST)
        }
        (SignUpStage::AwaitingMemberType, "1") => {
            next.setup_status = SignUpStatus::Completed;
            next.setup_stage = SignUpStage::Complete;
            next.intercessor = false;
            SignUpStep {
                leave_pool: member.intercessor,
                ..SignUpStep::advance(next, messages::requestor_welcome())
            }
        }
        (SignUpStage::AwaitingMemberType, "2") => {
            next.setup_stage = SignUpStage::AwaitingQuota;
            next.intercessor = true;
            SignUpStep::advance(next, messages::PRAYER_NUM_REQUEST)
        }
        (SignUpStage::AwaitingQuota, _) => match input.parse::<u32>() {
            Ok(limit) => {
                next.setup_status = SignUpStatus::Completed;
                next.setup_stage = SignUpStage::Complete;
                next.weekly_prayer_limit = limit;
                next.weekly_prayer_date = Some(now);
                SignUpStep {
                    join_pool: true,
                    ..SignUpStep::advance(next, messages::intercessor_welcome())
                }
            }
            Err(_) => SignUpStep::wrong_input(),
        },
        _ => SignUpStep::wrong_input(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_at(stage: SignUpStage, status: SignUpStatus) -> Member {
        Member {
            phone: "555".into(),
            setup_stage: stage,
            setup_status: status,
            ..Default::default()
        }
    }

    fn msg(body: &str) -> TextMessage {
        TextMessage::new(body, "555", "req-1")
    }

    #[test]
    fn test_classify_precedence() {
        let completed = member_at(SignUpStage::Complete, SignUpStatus::Completed);
        let signing_up = member_at(SignUpStage::AwaitingName, SignUpStatus::InProgress);
        let unknown = Member::unregistered("555");

        assert_eq!(classify(&msg("HELP"), &signing_up), Route::Help);
        assert_eq!(classify(&msg("Stop"), &signing_up), Route::Cancel);
        assert_eq!(classify(&msg("cancel"), &unknown), Route::Cancel);
        assert_eq!(classify(&msg("Pray"), &unknown), Route::SignUp);
        assert_eq!(classify(&msg("Pray"), &completed), Route::SignUp);
        assert_eq!(classify(&msg("prayed"), &signing_up), Route::SignUp);
        assert_eq!(classify(&msg("hello"), &unknown), Route::Drop);
        assert_eq!(classify(&msg("prayed"), &unknown), Route::Drop);
        assert_eq!(classify(&msg(" Prayed "), &completed), Route::CompletePrayer);
        assert_eq!(classify(&msg("prayyy"), &completed), Route::PrayerRequest);
    }

    #[test]
    fn test_pray_starts_sign_up() {
        let step = signup_step(&Member::unregistered("555"), "Pray", Utc::now());
        let member = step.update.unwrap();
        assert_eq!(member.setup_stage, SignUpStage::AwaitingName);
        assert_eq!(member.setup_status, SignUpStatus::InProgress);
        assert_eq!(step.reply, messages::NAME_REQUEST);
    }

    #[test]
    fn test_name_given() {
        let start = member_at(SignUpStage::AwaitingName, SignUpStatus::InProgress);
        let step = signup_step(&start, "John Doe", Utc::now());
        let member = step.update.unwrap();
        assert_eq!(member.name, "John Doe");
        assert_eq!(member.setup_stage, SignUpStage::AwaitingMemberType);
        assert_eq!(step.reply, messages::MEMBER_TYPE_REQUEST);
    }

    #[test]
    fn test_name_is_trimmed() {
        let start = member_at(SignUpStage::AwaitingName, SignUpStatus::InProgress);
        let step = signup_step(&start, "  Anna \n", Utc::now());
        assert_eq!(step.update.unwrap().name, "Anna");
    }

    #[test]
    fn test_intercessor_turning_requestor_leaves_pool() {
        let mut start = member_at(SignUpStage::AwaitingMemberType, SignUpStatus::InProgress);
        start.intercessor = true;
        let step = signup_step(&start, "1", Utc::now());
        assert!(step.leave_pool);
        assert!(!step.join_pool);
        assert!(!step.update.unwrap().intercessor);
    }

    #[test]
    fn test_anonymous_name() {
        let start = member_at(SignUpStage::AwaitingName, SignUpStatus::InProgress);
        let step = signup_step(&start, "2", Utc::now());
        let member = step.update.unwrap();
        assert_eq!(member.name, ANONYMOUS);
        assert_eq!(member.setup_stage, SignUpStage::AwaitingMemberType);
        assert_eq!(step.reply, messages::MEMBER_TYPE_REQUEST);
    }

    #[test]
    fn test_requestor_only() {
        let start = member_at(SignUpStage::AwaitingMemberType, SignUpStatus::InProgress);
        let step = signup_step(&start, "1", Utc::now());
        let member = step.update.unwrap();
        assert_eq!(member.setup_stage, SignUpStage::Complete);
        assert_eq!(member.setup_status, SignUpStatus::Completed);
        assert!(!member.intercessor);
        assert!(!step.join_pool);
        assert!(!step.leave_pool);
        assert_eq!(step.reply, messages::requestor_welcome());
    }

    #[test]
    fn test_intercessor_path() {
        let now = Utc::now();
        let start = member_at(SignUpStage::AwaitingMemberType, SignUpStatus::InProgress);
        let step = signup_step(&start, "2", now);
        let member = step.update.unwrap();
        assert_eq!(member.setup_stage, SignUpStage::AwaitingQuota);
        assert!(member.intercessor);
        assert_eq!(step.reply, messages::PRAYER_NUM_REQUEST);

        let step = signup_step(&member, "10", now);
        let done = step.update.unwrap();
        assert!(step.join_pool);
        assert_eq!(done.setup_stage, SignUpStage::Complete);
        assert_eq!(done.setup_status, SignUpStatus::Completed);
        assert_eq!(done.weekly_prayer_limit, 10);
        assert_eq!(done.weekly_prayer_date, Some(now));
        assert_eq!(step.reply, messages::intercessor_welcome());
    }

    #[test]
    fn test_bad_quota_does_not_advance() {
        let start = member_at(SignUpStage::AwaitingQuota, SignUpStatus::InProgress);
        for body in ["ten", "-3", "", "4.5"] {
            let step = signup_step(&start, body, Utc::now());
            assert!(step.is_wrong_input(), "{body:?} should be rejected");
            assert!(!step.join_pool);
            assert_eq!(step.reply, messages::WRONG_INPUT);
        }
    }

    #[test]
    fn test_wrong_member_type() {
        let start = member_at(SignUpStage::AwaitingMemberType, SignUpStatus::InProgress);
        let step = signup_step(&start, "wrong response to question", Utc::now());
        assert!(step.is_wrong_input());
    }

    #[test]
    fn test_only_known_stages_reachable() {
        let stages = [
            SignUpStage::NotStarted,
            SignUpStage::AwaitingName,
            SignUpStage::AwaitingMemberType,
            SignUpStage::AwaitingQuota,
            SignUpStage::Complete,
        ];
        let inputs = ["pray", "1", "2", "7", "Mary", "", "stop"];

        for stage in stages {
            for input in inputs {
                let start = member_at(stage, SignUpStatus::InProgress);
                let step = signup_step(&start, input, Utc::now());
                if let Some(next) = step.update {
                    // stages only move forward, except "pray" which restarts at 1
                    if input != "pray" {
                        assert!(next.setup_stage > stage, "{stage:?} + {input:?}");
                    } else {
                        assert_eq!(next.setup_stage, SignUpStage::AwaitingName);
                    }
                }
            }
        }
    }
}
