//! Guard against out-of-order fetch responses.
//!
//! Each search takes a [`FetchTicket`]. Only the ticket of the most recent search may replace
//! the displayed result; responses carrying an older ticket are dropped whenever they arrive.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    id: u64,
    digest: String,
}

impl FetchTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

#[derive(Debug)]
pub struct FetchSession<T> {
    issued: u64,
    displayed: Option<(FetchTicket, T)>,
}

impl<T> Default for FetchSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchSession<T> {
    pub fn new() -> Self {
        FetchSession {
            issued: 0,
            displayed: None,
        }
    }

    /// Starts a search. Every ticket issued before this one becomes stale.
    pub fn begin(&mut self, digest: impl Into<String>) -> FetchTicket {
        self.issued += 1;
        FetchTicket {
            id: self.issued,
            digest: digest.into(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.id == self.issued
    }

    /// Displays `value` if `ticket` belongs to the latest search. Returns whether it was
    /// accepted.
    pub fn resolve(&mut self, ticket: FetchTicket, value: T) -> bool {
        if !self.is_current(&ticket) {
            tracing::debug!(
                digest = %ticket.digest,
                ticket = ticket.id,
                latest = self.issued,
                "dropping stale fetch response"
            );
            return false;
        }
        self.displayed = Some((ticket, value));
        true
    }

    pub fn displayed(&self) -> Option<&T> {
        self.displayed.as_ref().map(|(_, value)| value)
    }

    pub fn displayed_digest(&self) -> Option<&str> {
        self.displayed.as_ref().map(|(ticket, _)| ticket.digest())
    }

    /// Back to the empty state. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.issued += 1;
        self.displayed = None;
    }
}
