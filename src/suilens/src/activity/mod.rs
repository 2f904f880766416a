//! Activity feed: one card per emitted event.

mod deposit;
mod stake;
mod swap;
mod visualizer;

pub use deposit::{DepositCard, DepositVisualizer};
pub use stake::{StakeCard, StakeVisualizer};
pub use swap::{SwapCard, SwapVisualizer};
pub use visualizer::{EventContext, EventVisualizer, visualize_with_any};

use serde::Serialize;

use crate::model::{EmittedEvent, TransactionRecord};
use crate::registry::{ProtocolEntry, ProtocolRegistry};
use crate::utils::{format_address, short_name};

/// Cards shown before the feed is expanded.
pub const INITIAL_FEED_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericCard {
    /// Trailing segment of the event type, e.g. `PriceUpdated`.
    pub name: String,
    pub protocol: Option<ProtocolEntry>,
    pub package_id: String,
}

impl GenericCard {
    fn from_event(event: &EmittedEvent, protocol: Option<ProtocolEntry>) -> Self {
        GenericCard {
            name: short_name(&event.event_type).to_string(),
            protocol,
            package_id: event.package_id.clone(),
        }
    }

    /// Protocol name, or the shortened package id when unresolved.
    pub fn source(&self) -> String {
        match self.protocol {
            Some(protocol) => protocol.name.to_string(),
            None => format_address(Some(&self.package_id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ActivityCard {
    Swap(SwapCard),
    Deposit(DepositCard),
    Stake(StakeCard),
    Generic(GenericCard),
}

impl ActivityCard {
    pub fn title(&self) -> String {
        match self {
            ActivityCard::Swap(card) => card.title(),
            ActivityCard::Deposit(card) => card.title().to_string(),
            ActivityCard::Stake(card) => card.title().to_string(),
            ActivityCard::Generic(card) => card.name.clone(),
        }
    }

    pub fn protocol(&self) -> Option<ProtocolEntry> {
        match self {
            ActivityCard::Swap(card) => card.protocol,
            ActivityCard::Deposit(card) => card.protocol,
            ActivityCard::Stake(card) => card.protocol,
            ActivityCard::Generic(card) => card.protocol,
        }
    }
}

/// Classifies one event. Visualizers are tried in priority order and the generic card
/// catches everything else, so every event yields exactly one card.
pub fn classify_event(event: &EmittedEvent, registry: &ProtocolRegistry) -> ActivityCard {
    let protocol = registry.lookup(&event.package_id);
    let context = EventContext::new(event, protocol);
    let visualizers: [&dyn EventVisualizer; 3] =
        [&SwapVisualizer, &DepositVisualizer, &StakeVisualizer];

    visualize_with_any(&visualizers, &context)
        .unwrap_or_else(|| ActivityCard::Generic(GenericCard::from_event(event, protocol)))
}

/// Every classified event of a transaction. Only the display is capped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityFeed {
    cards: Vec<ActivityCard>,
}

impl ActivityFeed {
    pub fn build(record: &TransactionRecord, registry: &ProtocolRegistry) -> Self {
        ActivityFeed {
            cards: record
                .events
                .iter()
                .map(|event| classify_event(event, registry))
                .collect(),
        }
    }

    pub fn cards(&self) -> &[ActivityCard] {
        &self.cards
    }

    pub fn visible(&self, show_all: bool) -> &[ActivityCard] {
        if show_all {
            &self.cards
        } else {
            &self.cards[..self.cards.len().min(INITIAL_FEED_LIMIT)]
        }
    }

    /// Cards left out of the collapsed view.
    pub fn hidden_count(&self) -> usize {
        self.cards.len().saturating_sub(INITIAL_FEED_LIMIT)
    }

    /// Label of the expand control, `None` when everything already fits.
    pub fn expand_label(&self) -> Option<String> {
        (self.hidden_count() > 0).then(|| format!("Show All ({})", self.cards.len()))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
