//! The subset of the Sui JSON-RPC `SuiTransactionBlockResponse` that suilens reads, and its
//! conversion into a [`TransactionRecord`].

use num_bigint::BigInt;
use serde::Deserialize;
use serde_json::Value;

use suilens::RecordError;
use suilens::model::{
    BalanceDelta, EmittedEvent, ExecutionStatus, GasCost, MoveCall, ObjectChangeKind, ObjectDelta,
    Operation, Owner, Payload, TransactionKind, TransactionRecord,
};

const PROGRAMMABLE_KIND: &str = "ProgrammableTransaction";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponse {
    pub digest: String,
    pub transaction: Option<WireTransaction>,
    pub effects: Option<WireEffects>,
    pub events: Option<Vec<WireEvent>>,
    pub object_changes: Option<Vec<WireObjectChange>>,
    pub balance_changes: Option<Vec<WireBalanceChange>>,
    pub timestamp_ms: Option<Value>,
    pub checkpoint: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireTransaction {
    pub data: WireTransactionData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireTransactionData {
    pub sender: Option<String>,
    pub transaction: WireKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireKind {
    pub kind: String,
    /// Commands, each a single-key object such as `{"SplitCoins": [...]}`.
    pub transactions: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEffects {
    pub status: WireStatus,
    pub gas_used: WireGasUsed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireStatus {
    pub status: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGasUsed {
    pub computation_cost: String,
    pub storage_cost: String,
    pub storage_rebate: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    pub package_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub parsed_json: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireObjectChange {
    #[serde(rename = "type")]
    pub change_type: String,
    pub object_type: Option<String>,
    pub object_id: Option<String>,
    pub package_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBalanceChange {
    pub owner: Value,
    pub coin_type: String,
    pub amount: String,
}

/// Display name of a transaction kind as reported in `transaction.data.transaction.kind`.
pub fn kind_display_name(kind: &str) -> &str {
    match kind {
        "ProgrammableTransaction" => "Programmable Transaction",
        "ChangeEpoch" => "Change Epoch",
        "Genesis" => "Genesis Transaction",
        "ConsensusCommitPrologue" => "Consensus Commit",
        "AuthenticatorStateUpdate" => "Authenticator State Update",
        "RandomnessStateUpdate" => "Randomness State Update",
        "EndOfEpochTransaction" => "End of Epoch Transaction",
        "ConsensusCommitPrologueV2" => "Consensus Commit Prologue V2",
        "ConsensusCommitPrologueV3" => "Consensus Commit Prologue V3",
        "ConsensusCommitPrologueV4" => "Consensus Commit Prologue V4",
        "ProgrammableSystemTransaction" => "Programmable System Transaction",
        other => other,
    }
}

impl TransactionBlockResponse {
    pub fn into_record(self) -> Result<TransactionRecord, RecordError> {
        let transaction = self
            .transaction
            .ok_or_else(|| RecordError::MissingData("transaction".to_string()))?;
        let effects = self
            .effects
            .ok_or_else(|| RecordError::MissingData("effects".to_string()))?;

        let kind_name = transaction.data.transaction.kind;
        let kind = if kind_name == PROGRAMMABLE_KIND {
            TransactionKind::Programmable
        } else {
            TransactionKind::System(kind_display_name(&kind_name).to_string())
        };
        let commands = transaction
            .data
            .transaction
            .transactions
            .map(|commands| commands.iter().map(decode_command).collect())
            .or_else(|| matches!(kind, TransactionKind::Programmable).then(Vec::new));

        let balance_changes = self
            .balance_changes
            .unwrap_or_default()
            .into_iter()
            .map(decode_balance)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TransactionRecord {
            digest: self.digest,
            sender: transaction.data.sender,
            status: decode_status(effects.status)?,
            gas: decode_gas(&effects.gas_used)?,
            kind,
            commands,
            balance_changes,
            object_changes: self
                .object_changes
                .unwrap_or_default()
                .into_iter()
                .filter_map(decode_object_change)
                .collect(),
            events: self
                .events
                .unwrap_or_default()
                .into_iter()
                .map(|event| EmittedEvent {
                    payload: Payload::from_json(&event.parsed_json),
                    package_id: event.package_id,
                    event_type: event.event_type,
                })
                .collect(),
            timestamp_ms: self.timestamp_ms.as_ref().and_then(as_u64),
            checkpoint: self.checkpoint.as_ref().and_then(as_u64),
        })
    }
}

fn decode_status(status: WireStatus) -> Result<ExecutionStatus, RecordError> {
    match status.status.as_str() {
        "success" => Ok(ExecutionStatus::Success),
        "failure" => Ok(ExecutionStatus::Failure {
            error: status.error.unwrap_or_default(),
        }),
        other => Err(RecordError::DecodeError(format!(
            "unknown execution status {other}"
        ))),
    }
}

fn decode_gas(gas: &WireGasUsed) -> Result<GasCost, RecordError> {
    let parse = |field: &str, raw: &str| {
        raw.parse::<u64>()
            .map_err(|e| RecordError::DecodeError(format!("gasUsed.{field} {raw:?}: {e}")))
    };

    Ok(GasCost {
        computation_cost: parse("computationCost", &gas.computation_cost)?,
        storage_cost: parse("storageCost", &gas.storage_cost)?,
        storage_rebate: parse("storageRebate", &gas.storage_rebate)?,
    })
}

fn decode_command(command: &Value) -> Operation {
    let Some((name, body)) = command.as_object().and_then(|map| map.iter().next()) else {
        return Operation::Other {
            name: command.as_str().unwrap_or("Unknown").to_string(),
        };
    };

    match name.as_str() {
        "MoveCall" => decode_move_call(body).unwrap_or_else(|| Operation::Other {
            name: name.clone(),
        }),
        "SplitCoins" => Operation::SplitCoins,
        "MergeCoins" => Operation::MergeCoins,
        "TransferObjects" => Operation::TransferObjects,
        "Publish" => Operation::Publish,
        _ => Operation::Other { name: name.clone() },
    }
}

fn decode_move_call(body: &Value) -> Option<Operation> {
    let field = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);

    Some(Operation::MoveCall(MoveCall {
        package: field("package")?,
        module: field("module")?,
        function: field("function")?,
        type_arguments: body
            .get("type_arguments")
            .and_then(Value::as_array)
            .map(|args| {
                args.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }))
}

pub fn decode_owner(owner: &Value) -> Owner {
    if owner.as_str() == Some("Immutable") {
        return Owner::Immutable;
    }

    let text = |value: Option<&Value>| value.and_then(Value::as_str).map(str::to_string);
    if let Some(address) = text(owner.get("AddressOwner")) {
        Owner::Address(address)
    } else if let Some(parent) = text(owner.get("ObjectOwner")) {
        Owner::Object(parent)
    } else if let Some(address) = text(owner.get("ConsensusAddressOwner").and_then(|o| o.get("owner"))) {
        Owner::ConsensusAddress(address)
    } else if owner.get("Shared").is_some() {
        Owner::Shared
    } else {
        Owner::Unknown
    }
}

fn decode_balance(change: WireBalanceChange) -> Result<BalanceDelta, RecordError> {
    let amount: BigInt = change.amount.parse().map_err(|e| {
        RecordError::DecodeError(format!("balance amount {:?}: {e}", change.amount))
    })?;

    Ok(BalanceDelta {
        owner: decode_owner(&change.owner),
        amount,
        coin_type: change.coin_type,
    })
}

fn decode_object_change(change: WireObjectChange) -> Option<ObjectDelta> {
    let kind = match change.change_type.as_str() {
        "created" => ObjectChangeKind::Created,
        "mutated" => ObjectChangeKind::Mutated,
        "published" => ObjectChangeKind::Published,
        "deleted" => ObjectChangeKind::Deleted,
        "wrapped" => ObjectChangeKind::Wrapped,
        "transferred" => ObjectChangeKind::Transferred,
        other => {
            tracing::debug!(change_type = other, "skipping unknown object change");
            return None;
        }
    };

    Some(ObjectDelta {
        kind,
        object_id: change.object_id.or(change.package_id),
        object_type: change.object_type,
    })
}

// Sui encodes u64 values as decimal strings in JSON-RPC.
fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.parse().ok(),
        other => other.as_u64(),
    }
}
