use num_bigint::BigInt;
use serde::Serialize;

use crate::activity::ActivityCard;
use crate::activity::visualizer::{EventContext, EventVisualizer};
use crate::registry::ProtocolEntry;
use crate::utils::{bigint_string, parse_amount, short_name, type_params};

const AMOUNT_IN_FIELDS: &[&str] = &["amount_in", "amountIn", "x_in", "y_in"];
const AMOUNT_OUT_FIELDS: &[&str] = &["amount_out", "amountOut", "x_out", "y_out"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapCard {
    pub protocol: Option<ProtocolEntry>,
    pub package_id: String,
    /// Short name of the first type parameter.
    pub coin_in: String,
    /// Short name of the second type parameter.
    pub coin_out: String,
    #[serde(with = "bigint_string")]
    pub amount_in: BigInt,
    #[serde(with = "bigint_string")]
    pub amount_out: BigInt,
}

impl SwapCard {
    pub fn title(&self) -> String {
        format!("Swap on {}", self.protocol.map_or("DEX", |p| p.name))
    }
}

/// Visualizer for DEX swap events
pub struct SwapVisualizer;

impl EventVisualizer for SwapVisualizer {
    fn can_handle(&self, context: &EventContext) -> bool {
        context.lowercase_type().contains("swap")
    }

    fn visualize(&self, context: &EventContext) -> ActivityCard {
        let event = context.event();
        let coins = type_params(&event.event_type);
        let coin_name = |index: usize, fallback: &str| {
            coins
                .get(index)
                .map_or(fallback.to_string(), |coin| short_name(coin).to_string())
        };

        // Direction is not decoded; the first type parameter is shown as the input side.
        ActivityCard::Swap(SwapCard {
            protocol: context.protocol(),
            package_id: event.package_id.clone(),
            coin_in: coin_name(0, "Token A"),
            coin_out: coin_name(1, "Token B"),
            amount_in: probe_amount(context, AMOUNT_IN_FIELDS),
            amount_out: probe_amount(context, AMOUNT_OUT_FIELDS),
        })
    }
}

pub(crate) fn probe_amount(context: &EventContext, fields: &[&str]) -> BigInt {
    context
        .event()
        .payload
        .probe(fields)
        .and_then(parse_amount)
        .unwrap_or_default()
}
