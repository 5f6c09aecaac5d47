// Request lifecycle shared by both screens
//
// idle -> loading -> success | error
//
// Every submission takes a Ticket. A response is applied only if its ticket
// is the one still outstanding, so a reset view or a superseded request can
// never write state.

use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            RequestState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Loading => "loading",
            RequestState::Success(_) => "success",
            RequestState::Error(_) => "error",
        }
    }
}

/// Identity of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    issued: u64,
    outstanding: Option<u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request; any earlier ticket becomes stale.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        self.outstanding = Some(self.issued);
        Ticket(self.issued)
    }

    /// True if `ticket` is the outstanding request, which is then closed.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if self.outstanding == Some(ticket.0) {
            self.outstanding = None;
            true
        } else {
            debug!(
                generation = ticket.0,
                outstanding = ?self.outstanding,
                "discarding stale response"
            );
            false
        }
    }

    /// Drops the outstanding request without settling it.
    pub fn invalidate(&mut self) {
        self.outstanding = None;
    }

    pub fn in_flight(&self) -> bool {
        self.outstanding.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        let state: RequestState<()> = RequestState::default();
        assert!(state.is_idle());
        assert!(!state.is_loading());
        assert_eq!(state.label(), "idle");
    }

    #[test]
    fn test_state_accessors() {
        let ok: RequestState<u8> = RequestState::Success(3);
        assert_eq!(ok.value(), Some(&3));
        assert_eq!(ok.error(), None);

        let failed: RequestState<u8> = RequestState::Error("boom".to_string());
        assert_eq!(failed.value(), None);
        assert_eq!(failed.error(), Some("boom"));
    }

    #[test]
    fn test_latest_ticket_wins() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();

        assert!(tracker.in_flight());
        assert!(!tracker.settle(first));
        assert!(tracker.in_flight());
        assert!(tracker.settle(second));
        assert!(!tracker.in_flight());
    }

    #[test]
    fn test_ticket_settles_once() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue();
        assert!(tracker.settle(ticket));
        assert!(!tracker.settle(ticket));
    }

    #[test]
    fn test_invalidate_discards_outstanding() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue();
        tracker.invalidate();

        assert!(!tracker.in_flight());
        assert!(!tracker.settle(ticket));

        // Generations keep increasing across invalidation
        let next = tracker.issue();
        assert!(next.generation() > ticket.generation());
    }
}
