use num_bigint::BigInt;
use serde::Serialize;

use crate::activity::ActivityCard;
use crate::activity::swap::probe_amount;
use crate::activity::visualizer::{EventContext, EventVisualizer};
use crate::registry::ProtocolEntry;
use crate::utils::bigint_string;

const AMOUNT_FIELDS: &[&str] = &["amount", "principal", "reward"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StakeCard {
    pub protocol: Option<ProtocolEntry>,
    pub package_id: String,
    pub unstake: bool,
    #[serde(with = "bigint_string")]
    pub amount: BigInt,
}

impl StakeCard {
    pub fn title(&self) -> &'static str {
        if self.unstake {
            "Unstake / Withdraw"
        } else {
            "Stake / Deposit"
        }
    }
}

/// Visualizer for staking and withdraw events
pub struct StakeVisualizer;

impl EventVisualizer for StakeVisualizer {
    fn can_handle(&self, context: &EventContext) -> bool {
        // "Withdraw" is matched case-sensitively on the raw tag.
        context.lowercase_type().contains("stake") || context.event_type().contains("Withdraw")
    }

    fn visualize(&self, context: &EventContext) -> ActivityCard {
        let lowercase = context.lowercase_type();
        ActivityCard::Stake(StakeCard {
            protocol: context.protocol(),
            package_id: context.event().package_id.clone(),
            unstake: lowercase.contains("unbind") || lowercase.contains("withdraw"),
            amount: probe_amount(context, AMOUNT_FIELDS),
        })
    }
}
