use num_bigint::BigInt;
use serde::Serialize;

use crate::classifier::narrative::receivers;
use crate::model::{BalanceDelta, Direction, TransactionRecord};
use crate::utils::{CoinType, bigint_string, format_address, format_signed_amount};

const OBJECT_OWNER_LABEL: &str = "Object";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRow {
    /// Shortened address, or `Object` when the owner is not an account.
    pub owner: String,
    pub owner_id: Option<String>,
    pub direction: Direction,
    #[serde(with = "bigint_string")]
    pub amount: BigInt,
    /// Sign-prefixed amount, e.g. `-1.50`.
    pub display_amount: String,
    pub symbol: String,
    pub coin_type: String,
}

impl BalanceRow {
    pub fn from_delta(delta: &BalanceDelta) -> Self {
        let owner = match delta.owner.address() {
            Some(address) => format_address(Some(address)),
            None => OBJECT_OWNER_LABEL.to_string(),
        };

        BalanceRow {
            owner,
            owner_id: delta.owner.id().map(str::to_string),
            direction: delta.direction(),
            amount: delta.amount.clone(),
            display_amount: format_signed_amount(&delta.amount),
            symbol: CoinType::parse(&delta.coin_type).symbol().to_string(),
            coin_type: delta.coin_type.clone(),
        }
    }
}

pub fn balance_rows(record: &TransactionRecord) -> Vec<BalanceRow> {
    record.balance_changes.iter().map(BalanceRow::from_delta).collect()
}

/// Sender on one side, distinct receivers on the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowView {
    pub sender: String,
    /// Shortened receiver ids; empty means the funds stayed in contract state.
    pub receivers: Vec<String>,
}

impl FlowView {
    pub fn from_record(record: &TransactionRecord) -> Self {
        FlowView {
            sender: format_address(record.sender.as_deref()),
            receivers: receivers(record)
                .iter()
                .map(|r| format_address(Some(r.id)))
                .collect(),
        }
    }

    pub fn destination_label(&self) -> &'static str {
        if self.receivers.is_empty() {
            "Contract / State"
        } else {
            "Receivers"
        }
    }
}
