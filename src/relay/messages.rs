//! Reply texts sent to members

pub const HELP: &str = "Prayer Texter connects people who need prayer with people willing to pray. \
Text pray to sign up, cancel or stop to leave, and prayed once you have prayed for a request \
sent to you.";

pub const NAME_REQUEST: &str = "Text your name, or 2 to stay anonymous";

pub const MEMBER_TYPE_REQUEST: &str =
    "Text 1 for prayer request, or 2 to be added to the intercessors list (to pray for others)";

pub const PRAYER_NUM_REQUEST: &str =
    "Send the max number of prayer texts you are willing to receive and pray for per week.";

pub const PRAYER_INSTRUCTIONS: &str =
    "You are now signed up to send prayer requests! Please send them directly to this number.";

pub const INTERCESSOR_INSTRUCTIONS: &str = "You are now signed up to receive prayer requests. \
Please try to pray for the requests ASAP. Once you are done praying, send 'prayed' back to this \
number for confirmation.";

pub const SIGN_UP_CONFIRMATION: &str =
    "You have opted in to Prayer Texter. Msg frequency varies. Reply help for help, stop to cancel.";

pub const WRONG_INPUT: &str = "Wrong input received during sign up process. Please try again.";

pub const REMOVE_USER: &str = "You have been removed from prayer texter. If you ever want to sign \
back up, text the word pray to this number.";

pub const PRAYER_SENT_OUT: &str = "Your prayer request has been sent out!";

pub const PRAYER_QUEUED: &str = "We could not find any available intercessors right now. Your \
prayer request has been added to the queue and will be sent out as soon as someone is available.";

pub const NO_ACTIVE_PRAYER: &str =
    "You have no more active prayers to mark as prayed. Thank you for praying!";

pub const PRAYER_THANK_YOU: &str = "Thank you for praying! We let the requestor know that you \
have prayed for them.";

/// Closing instructions for a member who only sends requests
pub fn requestor_welcome() -> String {
    format!("{}\n\n{}", PRAYER_INSTRUCTIONS, SIGN_UP_CONFIRMATION)
}

/// Closing instructions for a new intercessor
pub fn intercessor_welcome() -> String {
    format!(
        "{}\n\n{}\n\n{}",
        PRAYER_INSTRUCTIONS, INTERCESSOR_INSTRUCTIONS, SIGN_UP_CONFIRMATION
    )
}

/// Request forwarded to an intercessor
pub fn prayer_intro(requestor_name: &str, request: &str) -> String {
    format!("Hello! Please pray for {}:\n{}", requestor_name, request)
}

/// Notice to the requestor once an intercessor has prayed
pub fn prayer_confirmation(intercessor_name: &str) -> String {
    format!(
        "Your prayer request has been prayed for by {}.",
        intercessor_name
    )
}

/// Rejection of a request containing profanity
pub fn profanity_found(term: &str) -> String {
    format!(
        "There was profanity found in your prayer request:\n\n{}\n\nPlease try the request again \
without this word or words.",
        term
    )
}
