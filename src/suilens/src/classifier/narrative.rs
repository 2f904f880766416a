use std::fmt::{self, Display};

use num_traits::Signed;
use serde::Serialize;

use crate::model::{BalanceDelta, TransactionRecord};
use crate::registry::{ProtocolEntry, ProtocolRegistry};
use crate::utils::{CoinType, format_address, format_amount};

/// The first contract call of a transaction, resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryCall {
    /// `module::function`
    pub label: String,
    pub package: String,
    pub protocol: Option<ProtocolEntry>,
}

pub fn primary_call(record: &TransactionRecord, registry: &ProtocolRegistry) -> Option<PrimaryCall> {
    let call = record.primary_move_call()?;
    Some(PrimaryCall {
        label: call.label(),
        package: call.package.clone(),
        protocol: registry.lookup(&call.package),
    })
}

/// One distinct owner that gained funds and is not the sender.
#[derive(Debug, Clone, Copy)]
pub struct Receiver<'a> {
    /// [`Owner::key`](crate::model::Owner::key) of the receiving owner.
    pub id: &'a str,
    /// First positive delta seen for this owner.
    pub delta: &'a BalanceDelta,
}

/// Distinct receivers in first-seen order.
pub fn receivers(record: &TransactionRecord) -> Vec<Receiver<'_>> {
    let sender = record.sender.as_deref();
    let mut found: Vec<Receiver<'_>> = vec![];

    for delta in &record.balance_changes {
        if !delta.amount.is_positive() {
            continue;
        }
        let id = delta.owner.key();
        if Some(id) == sender || found.iter().any(|r| r.id == id) {
            continue;
        }
        found.push(Receiver { id, delta });
    }

    found
}

/// Heuristic one-sentence description of what the transaction did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Narrative {
    ProtocolCall {
        protocol: String,
        label: String,
    },
    ContractCall {
        label: String,
    },
    SingleTransfer {
        amount: String,
        symbol: String,
        recipient: String,
    },
    MultiTransfer {
        recipients: usize,
    },
    Generic,
}

impl Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Narrative::ProtocolCall { protocol, label } => {
                write!(f, "Sender interacted with {protocol} ({label}).")
            }
            Narrative::ContractCall { label } => write!(f, "Sender called {label}."),
            Narrative::SingleTransfer {
                amount,
                symbol,
                recipient,
            } => write!(f, "Sender transferred {amount} {symbol} to {recipient}."),
            Narrative::MultiTransfer { recipients } => {
                write!(f, "Sender transferred funds to {recipients} recipients.")
            }
            Narrative::Generic => write!(f, "The transaction interacted with the network."),
        }
    }
}

/// Picks the narrative. The rules are checked in a fixed order and the first match wins:
/// known protocol call, any contract call, a single receiver, several receivers, fallback.
pub fn narrate(record: &TransactionRecord, primary: Option<&PrimaryCall>) -> Narrative {
    if let Some(call) = primary {
        return match call.protocol {
            Some(protocol) => Narrative::ProtocolCall {
                protocol: protocol.name.to_string(),
                label: call.label.clone(),
            },
            None => Narrative::ContractCall {
                label: call.label.clone(),
            },
        };
    }

    match receivers(record).as_slice() {
        [] => Narrative::Generic,
        [only] => Narrative::SingleTransfer {
            amount: format_amount(&only.delta.amount),
            symbol: CoinType::parse(&only.delta.coin_type).symbol().to_string(),
            recipient: format_address(Some(only.id)),
        },
        many => Narrative::MultiTransfer {
            recipients: many.len(),
        },
    }
}
