use crate::activity::ActivityCard;
use crate::model::EmittedEvent;
use crate::registry::ProtocolEntry;

/// Everything a visualizer may look at for one event.
pub struct EventContext<'a> {
    event: &'a EmittedEvent,
    lowercase_type: String,
    protocol: Option<ProtocolEntry>,
}

impl<'a> EventContext<'a> {
    pub fn new(event: &'a EmittedEvent, protocol: Option<ProtocolEntry>) -> Self {
        Self {
            event,
            lowercase_type: event.event_type.to_lowercase(),
            protocol,
        }
    }

    pub fn event(&self) -> &'a EmittedEvent {
        self.event
    }

    /// The event type tag, unchanged.
    pub fn event_type(&self) -> &'a str {
        &self.event.event_type
    }

    /// The event type tag, lowercased once for case-insensitive matching.
    pub fn lowercase_type(&self) -> &str {
        &self.lowercase_type
    }

    pub fn protocol(&self) -> Option<ProtocolEntry> {
        self.protocol
    }
}

/// Trait for turning emitted events into activity cards
pub trait EventVisualizer {
    /// Check if this visualizer recognises the event
    fn can_handle(&self, context: &EventContext) -> bool;

    /// Build the card. Only called after `can_handle` returned true.
    fn visualize(&self, context: &EventContext) -> ActivityCard;
}

/// Helper function to try multiple visualizers in order
pub fn visualize_with_any(
    visualizers: &[&dyn EventVisualizer],
    context: &EventContext,
) -> Option<ActivityCard> {
    visualizers
        .iter()
        .find(|visualizer| visualizer.can_handle(context))
        .map(|visualizer| visualizer.visualize(context))
}
