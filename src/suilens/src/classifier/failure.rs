use std::fmt::{self, Display};

use serde::Serialize;

use crate::model::ExecutionStatus;

const INSUFFICIENT_BALANCE_MARKER: &str = "insufficient";
const MOVE_ABORT_MARKER: &str = "moveabort";

/// Best-effort reason a transaction failed on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    InsufficientBalance,
    ContractRejected,
    ExecutionHalted,
}

impl FailureCause {
    /// Checked in order: balance, abort, anything else.
    pub fn classify(error: &str) -> Self {
        let error = error.to_lowercase();
        if error.contains(INSUFFICIENT_BALANCE_MARKER) {
            FailureCause::InsufficientBalance
        } else if error.contains(MOVE_ABORT_MARKER) {
            FailureCause::ContractRejected
        } else {
            FailureCause::ExecutionHalted
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FailureCause::InsufficientBalance => "insufficient balance",
            FailureCause::ContractRejected => "contract rejected input",
            FailureCause::ExecutionHalted => "on-chain execution halted",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FailureCause::InsufficientBalance => {
                "The sender did not hold enough funds to cover the amounts or gas involved."
            }
            FailureCause::ContractRejected => {
                "A Move contract aborted the call and rejected its input."
            }
            FailureCause::ExecutionHalted => "Execution stopped on-chain before completing.",
        }
    }
}

impl Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classified cause plus the ledger's error text, unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDiagnostics {
    pub cause: FailureCause,
    pub cause_label: &'static str,
    pub raw_error: String,
}

impl FailureDiagnostics {
    pub fn for_status(status: &ExecutionStatus) -> Option<Self> {
        let error = status.error()?;
        let cause = FailureCause::classify(error);
        Some(FailureDiagnostics {
            cause,
            cause_label: cause.label(),
            raw_error: error.to_string(),
        })
    }
}
