use std::sync::Arc;
use std::time::Duration;

use suilens::{Explanation, NarrativeMode, NarrativeView, ProtocolRegistry};

use crate::config::ExplainerConfig;
use crate::errors::{ConfigError, FetchError};
use crate::ledger::{LedgerClient, SuiRpcClient};
use crate::narrative::{GroqNarrator, NarrativeProvider, ai_outcome};

/// Everything one search produces.
#[derive(Debug, Clone)]
pub struct ExplainOutcome {
    pub explanation: Explanation,
    pub narrative: NarrativeView,
}

/// Fetch, classify and optionally narrate a single transaction.
#[derive(Clone)]
pub struct Explainer {
    ledger: Arc<dyn LedgerClient>,
    narrator: Arc<dyn NarrativeProvider>,
    registry: &'static ProtocolRegistry,
}

impl Explainer {
    pub fn new(ledger: Arc<dyn LedgerClient>, narrator: Arc<dyn NarrativeProvider>) -> Self {
        Self {
            ledger,
            narrator,
            registry: ProtocolRegistry::global(),
        }
    }

    pub fn from_config(config: &ExplainerConfig) -> Result<Self, ConfigError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        Ok(Self::new(
            Arc::new(SuiRpcClient::from_config(config)?),
            Arc::new(GroqNarrator::new(&config.narrative, timeout)?),
        ))
    }

    pub fn ai_available(&self) -> bool {
        self.narrator.is_available()
    }

    /// `digest` must already be validated. A failed AI request only changes the narrative.
    pub async fn explain(&self, digest: &str, mode: NarrativeMode) -> Result<ExplainOutcome, FetchError> {
        let record = self.ledger.get_transaction(digest).await.inspect_err(|e| {
            tracing::error!(%digest, error = %e, "transaction fetch failed");
        })?;

        let explanation = Explanation::build(&record, self.registry);
        let ai = match mode {
            NarrativeMode::Ai => ai_outcome(self.narrator.as_ref(), &explanation.condensed()).await,
            NarrativeMode::Heuristic => None,
        };
        let narrative = NarrativeView::resolve(mode, &explanation.summary, ai.as_ref());

        Ok(ExplainOutcome {
            explanation,
            narrative,
        })
    }
}
