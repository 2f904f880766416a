//! Human-readable views of Sui transactions.
//!
//! Everything here is a pure function of an already fetched [`TransactionRecord`]:
//! the classifier summary, the command flow and the activity feed. Fetching and the optional
//! AI narrative live in the `suilens-rpc` crate.

pub mod activity;
pub mod classifier;
pub mod commands;
pub mod digest;
pub mod errors;
pub mod explanation;
pub mod model;
pub mod registry;
pub mod session;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use activity::{ActivityCard, ActivityFeed};
pub use classifier::{TxSummary, summarize};
pub use commands::{CommandStep, decompose};
pub use digest::{consume_deep_link, extract_digest, is_valid_digest, parse_input, share_link};
pub use errors::{InputError, RecordError};
pub use explanation::{AiNarrative, CondensedSummary, Explanation, NarrativeMode, NarrativeView};
pub use model::TransactionRecord;
pub use registry::{ProtocolEntry, ProtocolRegistry};
pub use session::{FetchSession, FetchTicket};
