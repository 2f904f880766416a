use num_bigint::BigInt;

use crate::activity::ActivityFeed;
use crate::commands::CommandStep;
use crate::explanation::Explanation;
use crate::model::{
    BalanceDelta, EmittedEvent, ExecutionStatus, GasCost, MoveCall, ObjectChangeKind, ObjectDelta,
    Operation, Owner, Payload, TransactionKind, TransactionRecord,
};

pub const DIGEST: &str = "7qXnTbH3vSg1WZ1pPzHc6yGFdV4r3bXmQJYu8TeLkN2A";
pub const SENDER: &str = "0x7d20dcdb2bca4f508ea9613994683eb4e76e9c4ed371169677c1be02aaf0b58e";
pub const RECEIVER_A: &str = "0xa11ce0000000000000000000000000000000000000000000000000000000b0b1";
pub const RECEIVER_B: &str = "0xb0b0000000000000000000000000000000000000000000000000000000ca4012";
pub const CETUS_PACKAGE: &str =
    "0x1eabed72c53feb3805120a081dc15963c20c1d28810123282f4e15e855c0e100";

/// Builds [`TransactionRecord`] fixtures. Starts as a successful programmable transaction
/// from [`SENDER`] with no commands and no effects.
pub struct RecordBuilder {
    record: TransactionRecord,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBuilder {
    pub fn new() -> Self {
        RecordBuilder {
            record: TransactionRecord {
                digest: DIGEST.to_string(),
                sender: Some(SENDER.to_string()),
                status: ExecutionStatus::Success,
                gas: GasCost::default(),
                kind: TransactionKind::Programmable,
                commands: Some(vec![]),
                balance_changes: vec![],
                object_changes: vec![],
                events: vec![],
                timestamp_ms: None,
                checkpoint: None,
            },
        }
    }

    pub fn digest(mut self, digest: &str) -> Self {
        self.record.digest = digest.to_string();
        self
    }

    pub fn sender(mut self, sender: Option<&str>) -> Self {
        self.record.sender = sender.map(str::to_string);
        self
    }

    fn command(mut self, operation: Operation) -> Self {
        self.record.commands.get_or_insert_with(Vec::new).push(operation);
        self
    }

    pub fn move_call(self, package: &str, module: &str, function: &str) -> Self {
        self.command(Operation::MoveCall(MoveCall {
            package: package.to_string(),
            module: module.to_string(),
            function: function.to_string(),
            type_arguments: vec![],
        }))
    }

    pub fn split_coins(self) -> Self {
        self.command(Operation::SplitCoins)
    }

    pub fn merge_coins(self) -> Self {
        self.command(Operation::MergeCoins)
    }

    pub fn transfer_objects(self) -> Self {
        self.command(Operation::TransferObjects)
    }

    pub fn publish(self) -> Self {
        self.command(Operation::Publish)
    }

    pub fn other_command(self, name: &str) -> Self {
        self.command(Operation::Other {
            name: name.to_string(),
        })
    }

    /// Non-programmable transaction: no command list.
    pub fn system_kind(mut self, name: &str) -> Self {
        self.record.kind = TransactionKind::System(name.to_string());
        self.record.commands = None;
        self
    }

    pub fn balance(self, address: &str, amount: i64, coin_type: &str) -> Self {
        self.balance_for(Owner::Address(address.to_string()), amount, coin_type)
    }

    pub fn object_balance(self, object_id: &str, amount: i64, coin_type: &str) -> Self {
        self.balance_for(Owner::Object(object_id.to_string()), amount, coin_type)
    }

    pub fn balance_for(mut self, owner: Owner, amount: i64, coin_type: &str) -> Self {
        self.record.balance_changes.push(BalanceDelta {
            owner,
            amount: BigInt::from(amount),
            coin_type: coin_type.to_string(),
        });
        self
    }

    pub fn gas(mut self, computation_cost: u64, storage_cost: u64, storage_rebate: u64) -> Self {
        self.record.gas = GasCost {
            computation_cost,
            storage_cost,
            storage_rebate,
        };
        self
    }

    pub fn failed(mut self, error: &str) -> Self {
        self.record.status = ExecutionStatus::Failure {
            error: error.to_string(),
        };
        self
    }

    fn object_change(mut self, kind: ObjectChangeKind, id: &str, object_type: Option<&str>) -> Self {
        self.record.object_changes.push(ObjectDelta {
            kind,
            object_id: Some(id.to_string()),
            object_type: object_type.map(str::to_string),
        });
        self
    }

    pub fn created(self, id: &str, object_type: &str) -> Self {
        self.object_change(ObjectChangeKind::Created, id, Some(object_type))
    }

    pub fn mutated(self, id: &str, object_type: &str) -> Self {
        self.object_change(ObjectChangeKind::Mutated, id, Some(object_type))
    }

    pub fn published(self, package_id: &str) -> Self {
        self.object_change(ObjectChangeKind::Published, package_id, None)
    }

    pub fn event(mut self, package_id: &str, event_type: &str, fields: &[(&str, &str)]) -> Self {
        let mut payload = Payload::default();
        for (key, value) in fields {
            payload.insert(*key, *value);
        }
        self.record.events.push(EmittedEvent {
            package_id: package_id.to_string(),
            event_type: event_type.to_string(),
            payload,
        });
        self
    }

    pub fn build(self) -> TransactionRecord {
        self.record
    }
}

pub fn assert_narrative(explanation: &Explanation, expected: &str) {
    assert_eq!(
        explanation.summary.narrative_text, expected,
        "Unexpected narrative for {}",
        explanation.summary.digest
    );
}

pub fn assert_has_card(feed: &ActivityFeed, title: &str) {
    let titles: Vec<String> = feed.cards().iter().map(|card| card.title()).collect();
    assert!(
        titles.iter().any(|t| t == title),
        "Should have a {title} card. Actual cards: {titles:?}"
    );
}

pub fn assert_has_step_with_detail(steps: &[CommandStep], label: &str, detail: &str) {
    let found: Vec<(&str, Option<&str>)> = steps
        .iter()
        .map(|step| (step.label.as_str(), step.detail.as_deref()))
        .collect();
    assert!(
        found.contains(&(label, Some(detail))),
        "Should have a {label} step with detail {detail}. Actual steps: {found:?}"
    );
}
