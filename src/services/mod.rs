//! External collaborators consumed by the relay
//!
//! - **Transport**: outbound text delivery
//! - **Profanity**: request screening
//! - **Ids**: synthetic keys for queued prayers

pub mod ids;
pub mod profanity;
pub mod transport;

pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use profanity::{ProfanityScanner, WordListScanner};
pub use transport::{LogSender, RecordingSender, SentText, TextSender};
