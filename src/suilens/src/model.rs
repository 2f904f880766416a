//! Read-only snapshot of one fetched transaction.
//!
//! Every view in this crate is derived from a [`TransactionRecord`]. The record is built once
//! by the ledger client and never mutated afterwards; each fetch produces an independent one.

use std::collections::BTreeMap;
use std::fmt;

use num_bigint::BigInt;
use num_traits::Signed;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::bigint_string;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub digest: String,
    pub sender: Option<String>,
    pub status: ExecutionStatus,
    pub gas: GasCost,
    pub kind: TransactionKind,
    /// Present only for programmable transactions.
    pub commands: Option<Vec<Operation>>,
    pub balance_changes: Vec<BalanceDelta>,
    pub object_changes: Vec<ObjectDelta>,
    pub events: Vec<EmittedEvent>,
    pub timestamp_ms: Option<u64>,
    pub checkpoint: Option<u64>,
}

impl TransactionRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ExecutionStatus::Success)
    }

    /// The first contract call in execution order, if any.
    pub fn primary_move_call(&self) -> Option<&MoveCall> {
        self.commands.as_ref()?.iter().find_map(|op| match op {
            Operation::MoveCall(call) => Some(call),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Success => "success",
            ExecutionStatus::Failure { .. } => "failure",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ExecutionStatus::Success => None,
            ExecutionStatus::Failure { error } => Some(error),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gas figures in MIST as reported by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasCost {
    pub computation_cost: u64,
    pub storage_cost: u64,
    pub storage_rebate: u64,
}

impl GasCost {
    /// `computation + storage - rebate`. Not floored at zero: a rebate larger than the
    /// charges yields a negative total.
    pub fn total(&self) -> BigInt {
        BigInt::from(self.computation_cost) + BigInt::from(self.storage_cost)
            - BigInt::from(self.storage_rebate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Programmable,
    System(String),
}

impl TransactionKind {
    pub fn display_name(&self) -> &str {
        match self {
            TransactionKind::Programmable => "Programmable Transaction",
            TransactionKind::System(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    MoveCall(MoveCall),
    SplitCoins,
    MergeCoins,
    TransferObjects,
    Publish,
    /// Any command kind without a dedicated variant, carrying its wire name.
    Other { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    pub package: String,
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<String>,
}

impl MoveCall {
    /// `module::function`
    pub fn label(&self) -> String {
        format!("{}::{}", self.module, self.function)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Owner {
    Address(String),
    Object(String),
    ConsensusAddress(String),
    Shared,
    Immutable,
    Unknown,
}

impl Owner {
    /// Account address for owners that are accounts.
    pub fn address(&self) -> Option<&str> {
        match self {
            Owner::Address(a) | Owner::ConsensusAddress(a) => Some(a),
            _ => None,
        }
    }

    /// Identifier for owners that have one, accounts and parent objects alike.
    pub fn id(&self) -> Option<&str> {
        match self {
            Owner::Address(a) | Owner::ConsensusAddress(a) | Owner::Object(a) => Some(a),
            _ => None,
        }
    }

    /// Identity used to tell owners apart: the id when there is one, else the owner kind.
    pub fn key(&self) -> &str {
        match self {
            Owner::Address(a) | Owner::ConsensusAddress(a) | Owner::Object(a) => a,
            Owner::Shared => "Shared",
            Owner::Immutable => "Immutable",
            Owner::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDelta {
    pub owner: Owner,
    /// Signed amount in the smallest unit, 9 implied decimals.
    #[serde(with = "bigint_string")]
    pub amount: BigInt,
    pub coin_type: String,
}

impl BalanceDelta {
    pub fn direction(&self) -> Direction {
        if self.amount.is_positive() {
            Direction::Received
        } else {
            Direction::Sent
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectChangeKind {
    Created,
    Mutated,
    Published,
    Deleted,
    Wrapped,
    Transferred,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDelta {
    pub kind: ObjectChangeKind,
    pub object_id: Option<String>,
    /// Absent for published packages.
    pub object_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    pub package_id: String,
    pub event_type: String,
    pub payload: Payload,
}

/// Event fields reduced to the number-like values the activity feed can use.
///
/// Keys whose value is not an integer (or an integer encoded as a string) are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, String>);

impl Payload {
    pub fn from_json(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        Self(
            map.iter()
                .filter_map(|(key, value)| number_like(value).map(|n| (key.clone(), n)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the value of the first key in `candidates` that is present.
    pub fn probe(&self, candidates: &[&str]) -> Option<&str> {
        candidates.iter().find_map(|key| self.get(key))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn number_like(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        Value::String(s) if s.parse::<BigInt>().is_ok() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use serde_json::json;

    #[test]
    fn gas_total_is_signed() {
        let gas = GasCost {
            computation_cost: 1_000,
            storage_cost: 2_000,
            storage_rebate: 5_000,
        };
        assert_eq!(gas.total(), BigInt::from(-2_000));
    }

    #[test]
    fn gas_total_does_not_overflow_u64() {
        let gas = GasCost {
            computation_cost: u64::MAX,
            storage_cost: u64::MAX,
            storage_rebate: 0,
        };
        assert_eq!(gas.total(), BigInt::from(u64::MAX) * 2);
    }

    #[test]
    fn payload_keeps_only_number_like_values() {
        let payload = Payload::from_json(&json!({
            "amount_in": "1500",
            "amount_out": 42,
            "pool": "0xabc",
            "a_to_b": true,
            "nested": { "amount": "1" },
        }));

        assert_eq!(payload.get("amount_in"), Some("1500"));
        assert_eq!(payload.get("amount_out"), Some("42"));
        assert_eq!(payload.get("pool"), None);
        assert_eq!(payload.get("a_to_b"), None);
        assert_eq!(payload.get("nested"), None);
    }

    #[test]
    fn payload_probe_is_first_match_wins() {
        let payload = Payload::from_json(&json!({ "x_in": "7", "amountIn": "9" }));
        assert_eq!(
            payload.probe(&["amount_in", "amountIn", "x_in"]),
            Some("9")
        );
        assert_eq!(payload.probe(&["missing"]), None);
    }

    #[test]
    fn non_object_payload_is_empty() {
        assert!(Payload::from_json(&json!([1, 2])).is_empty());
        assert!(Payload::from_json(&Value::Null).is_empty());
    }

    #[test]
    fn zero_delta_counts_as_sent() {
        let delta = BalanceDelta {
            owner: Owner::Address("0x1".into()),
            amount: BigInt::zero(),
            coin_type: "0x2::sui::SUI".into(),
        };
        assert_eq!(delta.direction(), Direction::Sent);
    }
}
