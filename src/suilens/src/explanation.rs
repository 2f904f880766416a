//! The complete set of views for one transaction, plus the narrative shown on top of it.

use serde::Serialize;

use crate::activity::ActivityFeed;
use crate::classifier::{TxSummary, summarize};
use crate::commands::{CommandStep, decompose};
use crate::model::TransactionRecord;
use crate::registry::ProtocolRegistry;
use crate::utils::format_address;

pub const HIGH_CONFIDENCE: &str = "High Confidence";
pub const MEDIUM_CONFIDENCE: &str = "Medium Confidence";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub summary: TxSummary,
    pub steps: Vec<CommandStep>,
    pub activity: ActivityFeed,
}

impl Explanation {
    /// Derives every view from `record`. Pure; no state is shared between explanations.
    pub fn build(record: &TransactionRecord, registry: &ProtocolRegistry) -> Self {
        Explanation {
            summary: summarize(record, registry),
            steps: decompose(record, registry),
            activity: ActivityFeed::build(record, registry),
        }
    }

    pub fn condensed(&self) -> CondensedSummary {
        CondensedSummary::from_summary(&self.summary)
    }
}

/// One balance change as sent to the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CondensedBalance {
    pub owner: String,
    pub amount: String,
    pub coin: String,
}

/// What the text-generation service gets to see. Identifiers are shortened and amounts
/// are already scaled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CondensedSummary {
    pub sender: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub primary_action: String,
    pub balance_changes: Vec<CondensedBalance>,
    pub object_changes: usize,
}

impl CondensedSummary {
    pub fn from_summary(summary: &TxSummary) -> Self {
        CondensedSummary {
            sender: format_address(summary.sender.as_deref()),
            status: summary.status.as_str().to_string(),
            error: summary.status.error().map(str::to_string),
            primary_action: summary.primary_label().to_string(),
            balance_changes: summary
                .balances
                .iter()
                .map(|row| CondensedBalance {
                    owner: row.owner.clone(),
                    amount: row.display_amount.clone(),
                    coin: row.symbol.clone(),
                })
                .collect(),
            object_changes: summary.objects.total_changes,
        }
    }
}

/// Text returned by the narrative service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiNarrative {
    pub text: String,
    pub model_label: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeMode {
    #[default]
    Heuristic,
    Ai,
}

/// Cosmetic label keyed only on whether the primary call hit the registry.
pub fn confidence_label(summary: &TxSummary) -> &'static str {
    if summary.protocol_resolved() {
        HIGH_CONFIDENCE
    } else {
        MEDIUM_CONFIDENCE
    }
}

/// The narrative actually displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeView {
    pub mode: NarrativeMode,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<&'static str>,
    /// Set when the AI narrative failed; `text` then holds the error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NarrativeView {
    pub fn heuristic(summary: &TxSummary) -> Self {
        NarrativeView {
            mode: NarrativeMode::Heuristic,
            text: summary.narrative_text.clone(),
            model_label: None,
            confidence: None,
            error: None,
        }
    }

    /// Picks the text for `mode`. AI mode without an AI outcome falls back to the heuristic
    /// narrative; a failed AI request shows its error message in place of the narrative.
    pub fn resolve(
        mode: NarrativeMode,
        summary: &TxSummary,
        ai: Option<&Result<AiNarrative, String>>,
    ) -> Self {
        match (mode, ai) {
            (NarrativeMode::Ai, Some(Ok(narrative))) => NarrativeView {
                mode,
                text: narrative.text.clone(),
                model_label: Some(narrative.model_label.clone()),
                confidence: Some(confidence_label(summary)),
                error: None,
            },
            (NarrativeMode::Ai, Some(Err(message))) => NarrativeView {
                mode,
                text: message.clone(),
                model_label: None,
                confidence: None,
                error: Some(message.clone()),
            },
            _ => Self::heuristic(summary),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{CETUS_PACKAGE, RECEIVER_A, RecordBuilder, SENDER};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn swap_explanation() -> Explanation {
        let record = RecordBuilder::new()
            .split_coins()
            .move_call(CETUS_PACKAGE, "pool_script", "swap_a2b")
            .transfer_objects()
            .balance(SENDER, -2_000_000_000, "0x2::sui::SUI")
            .balance(RECEIVER_A, 512_340_000, "0xdba3::usdc::USDC")
            .created("0x77", "0x2::coin::Coin<0xdba3::usdc::USDC>")
            .mutated("0x78", "0x2::dynamic_field::Field<u64, 0x1eab::tick::Tick>")
            .event(CETUS_PACKAGE, "0x1eab::pool::SwapEvent<0x2::sui::SUI, 0xdba3::usdc::USDC>", &[("amount_in", "2000000000")])
            .build();
        Explanation::build(&record, &ProtocolRegistry::with_known_protocols())
    }

    #[test]
    fn explanation_combines_every_view() {
        let explanation = swap_explanation();
        assert_eq!(explanation.steps.len(), 3);
        assert_eq!(explanation.activity.len(), 1);
        assert_eq!(
            explanation.summary.narrative_text,
            "Sender interacted with Cetus CLMM (pool_script::swap_a2b)."
        );
    }

    #[test]
    fn condensed_summary_shape() {
        let condensed = swap_explanation().condensed();
        assert_eq!(
            serde_json::to_value(&condensed).unwrap(),
            json!({
                "sender": format_address(Some(SENDER)),
                "status": "success",
                "primaryAction": "pool_script::swap_a2b",
                "balanceChanges": [
                    { "owner": format_address(Some(SENDER)), "amount": "-2.00", "coin": "SUI" },
                    { "owner": format_address(Some(RECEIVER_A)), "amount": "+0.51234", "coin": "USDC" },
                ],
                "objectChanges": 2,
            })
        );
    }

    #[test]
    fn ai_narrative_carries_model_and_confidence() {
        let explanation = swap_explanation();
        let ai = Ok(AiNarrative {
            text: "Sender swapped SUI for USDC on Cetus.".into(),
            model_label: "llama-3.3-70b-versatile (via Groq)".into(),
        });

        let view = NarrativeView::resolve(NarrativeMode::Ai, &explanation.summary, Some(&ai));
        assert_eq!(view.text, "Sender swapped SUI for USDC on Cetus.");
        assert_eq!(view.confidence, Some(HIGH_CONFIDENCE));
        assert!(!view.is_failure());
    }

    #[test]
    fn ai_failure_replaces_text_and_heuristic_stays_selectable() {
        let explanation = swap_explanation();
        let ai = Err("Groq API Error: rate limited".to_string());

        let failed = NarrativeView::resolve(NarrativeMode::Ai, &explanation.summary, Some(&ai));
        assert_eq!(failed.text, "Groq API Error: rate limited");
        assert!(failed.is_failure());

        let back = NarrativeView::resolve(NarrativeMode::Heuristic, &explanation.summary, Some(&ai));
        assert_eq!(back, NarrativeView::heuristic(&explanation.summary));
    }

    #[test]
    fn ai_mode_without_outcome_falls_back() {
        let explanation = swap_explanation();
        let view = NarrativeView::resolve(NarrativeMode::Ai, &explanation.summary, None);
        assert_eq!(view.mode, NarrativeMode::Heuristic);
        assert_eq!(view.text, explanation.summary.narrative_text);
    }

    #[test]
    fn unresolved_protocol_is_medium_confidence() {
        let record = RecordBuilder::new().move_call("0xfeed", "vault", "deposit").build();
        let explanation = Explanation::build(&record, &ProtocolRegistry::with_known_protocols());
        assert_eq!(confidence_label(&explanation.summary), MEDIUM_CONFIDENCE);
    }

    #[test]
    fn failed_execution_is_explained_not_rejected() {
        let record = RecordBuilder::new().failed("InsufficientGas").build();
        assert!(!record.is_success());
        let explanation = Explanation::build(&record, &ProtocolRegistry::with_known_protocols());
        assert_eq!(
            explanation.condensed().error.as_deref(),
            Some("InsufficientGas")
        );
    }
}
