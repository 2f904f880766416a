use num_bigint::BigInt;
use serde::Serialize;

use crate::activity::ActivityCard;
use crate::activity::swap::probe_amount;
use crate::activity::visualizer::{EventContext, EventVisualizer};
use crate::registry::ProtocolEntry;
use crate::utils::bigint_string;

const MARKERS: &[&str] = &["deposit", "mint", "add_liquidity"];
const AMOUNT_FIELDS: &[&str] = &["amount", "token_amount", "coin_amount"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepositCard {
    pub protocol: Option<ProtocolEntry>,
    pub package_id: String,
    #[serde(with = "bigint_string")]
    pub amount: BigInt,
}

impl DepositCard {
    pub fn title(&self) -> &'static str {
        "Deposit / Add Liq"
    }
}

/// Visualizer for deposits, mints and liquidity additions
pub struct DepositVisualizer;

impl EventVisualizer for DepositVisualizer {
    fn can_handle(&self, context: &EventContext) -> bool {
        MARKERS
            .iter()
            .any(|marker| context.lowercase_type().contains(marker))
    }

    fn visualize(&self, context: &EventContext) -> ActivityCard {
        ActivityCard::Deposit(DepositCard {
            protocol: context.protocol(),
            package_id: context.event().package_id.clone(),
            amount: probe_amount(context, AMOUNT_FIELDS),
        })
    }
}
