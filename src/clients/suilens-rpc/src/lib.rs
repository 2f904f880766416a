//! Network collaborators for suilens: the Sui fullnode and the narrative service.

pub mod config;
pub mod errors;
pub mod explainer;
pub mod ledger;
pub mod narrative;
pub mod wire;

pub use config::ExplainerConfig;
pub use explainer::{ExplainOutcome, Explainer};
pub use errors::{ConfigError, FETCH_FAILED_MESSAGE, FetchError, NarrativeError};
pub use ledger::{LedgerClient, SuiRpcClient};
pub use narrative::{GroqNarrator, NarrativeProvider, ai_outcome};
