//! Status, gas, balance, object and narrative views of one transaction.

mod balances;
mod failure;
mod gas;
mod narrative;
mod objects;

pub use balances::{BalanceRow, FlowView, balance_rows};
pub use failure::{FailureCause, FailureDiagnostics};
pub use gas::GasSummary;
pub use narrative::{Narrative, PrimaryCall, Receiver, narrate, primary_call, receivers};
pub use objects::{MUTATED_PREVIEW_LIMIT, ObjectRow, ObjectSummary};

use serde::Serialize;

use crate::model::{ExecutionStatus, TransactionRecord};
use crate::registry::ProtocolRegistry;

/// Label used when a transaction has no contract call.
pub const NO_CALL_LABEL: &str = "Transaction";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxSummary {
    pub digest: String,
    pub sender: Option<String>,
    pub status: ExecutionStatus,
    pub primary: Option<PrimaryCall>,
    pub narrative: Narrative,
    pub narrative_text: String,
    pub gas: GasSummary,
    pub balances: Vec<BalanceRow>,
    pub objects: ObjectSummary,
    pub failure: Option<FailureDiagnostics>,
    pub flow: FlowView,
}

impl TxSummary {
    /// `module::function` of the primary call, or [`NO_CALL_LABEL`].
    pub fn primary_label(&self) -> &str {
        self.primary
            .as_ref()
            .map_or(NO_CALL_LABEL, |call| call.label.as_str())
    }

    pub fn protocol_resolved(&self) -> bool {
        self.primary.as_ref().is_some_and(|call| call.protocol.is_some())
    }
}

pub fn summarize(record: &TransactionRecord, registry: &ProtocolRegistry) -> TxSummary {
    let primary = primary_call(record, registry);
    if primary.is_none() {
        tracing::debug!(digest = %record.digest, "no contract call, narrating from balance changes");
    }

    let narrative = narrate(record, primary.as_ref());

    TxSummary {
        digest: record.digest.clone(),
        sender: record.sender.clone(),
        status: record.status.clone(),
        narrative_text: narrative.to_string(),
        narrative,
        primary,
        gas: GasSummary::from_cost(&record.gas),
        balances: balance_rows(record),
        objects: ObjectSummary::from_changes(&record.object_changes),
        failure: FailureDiagnostics::for_status(&record.status),
        flow: FlowView::from_record(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{CETUS_PACKAGE, RECEIVER_A, RecordBuilder, SENDER};

    #[test]
    fn failed_move_abort_keeps_raw_error() {
        let raw = "MoveAbort(MoveLocation { module: ModuleId { address: 0x1eab, name: Identifier(\"router\") }, function: 3, instruction: 12, function_name: Some(\"swap\") }, 7) in command 1";
        let record = RecordBuilder::new()
            .move_call(CETUS_PACKAGE, "router", "swap")
            .failed(raw)
            .build();

        let summary = summarize(&record, &ProtocolRegistry::with_known_protocols());
        assert_eq!(summary.status.as_str(), "failure");

        let failure = summary.failure.unwrap();
        assert_eq!(failure.raw_error, raw);
        assert_eq!(failure.cause_label, "contract rejected input");
    }

    #[test]
    fn summary_exposes_primary_label() {
        let record = RecordBuilder::new()
            .move_call(CETUS_PACKAGE, "pool_script", "swap_b2a")
            .build();
        let summary = summarize(&record, &ProtocolRegistry::with_known_protocols());
        assert_eq!(summary.primary_label(), "pool_script::swap_b2a");
        assert!(summary.protocol_resolved());
        assert_eq!(summary.failure, None);
    }

    #[test]
    fn transfer_summary_without_calls() {
        let record = RecordBuilder::new()
            .balance(SENDER, -1_000_000_000, "0x2::sui::SUI")
            .balance(RECEIVER_A, 1_000_000_000, "0x2::sui::SUI")
            .gas(1_000_000, 2_000_000, 500_000)
            .build();
        let summary = summarize(&record, &ProtocolRegistry::with_known_protocols());

        assert_eq!(summary.primary_label(), NO_CALL_LABEL);
        assert!(!summary.protocol_resolved());
        assert_eq!(summary.balances.len(), 2);
        assert_eq!(summary.gas.display, "0.0025");
        assert_eq!(summary.flow.receivers.len(), 1);
    }
}
