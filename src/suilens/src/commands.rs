//! Per-step labels for the commands of a programmable transaction.
//!
//! Steps keep the on-chain execution order. Later commands may consume results of earlier
//! ones, so nothing is reordered, merged or dropped here.

use serde::Serialize;

use crate::model::{Operation, TransactionRecord};
use crate::registry::ProtocolRegistry;

pub const MOVE_CALL_LABEL: &str = "MoveCall";
pub const GENERIC_PACKAGE_ICON: &str = "📦";
pub const GENERIC_COMMAND_LABEL: &str = "Command";
pub const GENERIC_COMMAND_ICON: &str = "🔹";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandStep {
    pub index: usize,
    pub label: String,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// One step per command. Transactions without a command list are shown as a single
/// opaque step named after their kind.
pub fn decompose(record: &TransactionRecord, registry: &ProtocolRegistry) -> Vec<CommandStep> {
    let Some(commands) = &record.commands else {
        return vec![CommandStep {
            index: 0,
            label: record.kind.display_name().to_string(),
            icon: GENERIC_COMMAND_ICON,
            detail: None,
        }];
    };

    commands
        .iter()
        .enumerate()
        .map(|(index, operation)| describe(index, operation, registry))
        .collect()
}

fn describe(index: usize, operation: &Operation, registry: &ProtocolRegistry) -> CommandStep {
    let fixed = |label: &str, icon: &'static str| CommandStep {
        index,
        label: label.to_string(),
        icon,
        detail: None,
    };

    match operation {
        Operation::MoveCall(call) => {
            let protocol = registry.lookup(&call.package);
            CommandStep {
                index,
                label: protocol.map_or(MOVE_CALL_LABEL, |p| p.name).to_string(),
                icon: protocol.map_or(GENERIC_PACKAGE_ICON, |p| p.icon),
                detail: Some(call.function.clone()),
            }
        }
        Operation::SplitCoins => fixed("SplitCoins", "✂️"),
        Operation::MergeCoins => fixed("MergeCoins", "🔗"),
        Operation::TransferObjects => fixed("TransferObjects", "📤"),
        Operation::Publish => fixed("Publish", "🚀"),
        Operation::Other { name } => CommandStep {
            detail: Some(name.clone()),
            ..fixed(GENERIC_COMMAND_LABEL, GENERIC_COMMAND_ICON)
        },
    }
}
