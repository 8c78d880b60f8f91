//! Drops responses that no longer match what the card is showing.
//!
//! Every fetch takes a ticket. Starting a newer fetch, or tearing the view
//! down, invalidates older tickets; their results must not be applied.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct GuardState {
    generation: AtomicU64,
    cancelled: AtomicBool,
}

#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    state: Arc<GuardState>,
}

/// Proof of which request generation a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request; every earlier ticket becomes stale.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.state.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while `ticket` is the latest request and the view is alive.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        !self.state.cancelled.load(Ordering::SeqCst)
            && self.state.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// The view went away; nothing in flight may be applied.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let guard = RequestGuard::new();
        let first = guard.begin();
        assert!(guard.is_current(first));

        let second = guard.begin();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[test]
    fn test_out_of_order_completion() {
        // 7d requested, then 90d; the 7d response arrives last and is dropped
        let guard = RequestGuard::new();
        let week = guard.begin();
        let quarter = guard.begin();
        assert!(guard.is_current(quarter));
        assert!(!guard.is_current(week));
    }

    #[test]
    fn test_cancel_invalidates_everything() {
        let guard = RequestGuard::new();
        let ticket = guard.begin();
        let shared = guard.clone();
        shared.cancel();
        assert!(guard.is_cancelled());
        assert!(!guard.is_current(ticket));
        let later = guard.begin();
        assert!(!guard.is_current(later));
    }
}
