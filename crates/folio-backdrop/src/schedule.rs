//! Frame scheduling capability: "call me again before the next repaint".

use std::collections::BTreeSet;

/// Ticket for one requested frame callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Host-provided per-frame callback scheduler.
pub trait FrameScheduler {
    /// Requests one callback on the next frame.
    fn request_frame(&mut self) -> FrameToken;
    /// Cancels a pending request. Unknown or already-fired tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Queue of pending frame requests, drained by the host once per presented frame.
///
/// Requests made while handling a drained batch land in the next batch, so a
/// loop that reschedules from its tick runs exactly once per frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: BTreeSet<FrameToken>,
    next: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every pending token, oldest first.
    pub fn drain_due(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn is_pending(&self, token: FrameToken) -> bool {
        self.pending.contains(&token)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next);
        self.next += 1;
        self.pending.insert(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.remove(&token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_requests_in_order_and_empties() {
        let mut q = FrameQueue::new();
        let a = q.request_frame();
        let b = q.request_frame();
        assert_eq!(q.drain_due(), vec![a, b]);
        assert_eq!(q.pending_count(), 0);
    }

    #[test]
    fn requests_during_a_batch_wait_for_the_next() {
        let mut q = FrameQueue::new();
        q.request_frame();
        let batch = q.drain_due();
        let again = q.request_frame();
        assert_eq!(batch.len(), 1);
        assert!(q.is_pending(again));
        assert_eq!(q.drain_due(), vec![again]);
    }

    #[test]
    fn cancelled_requests_never_fire() {
        let mut q = FrameQueue::new();
        let a = q.request_frame();
        let b = q.request_frame();
        q.cancel_frame(a);
        q.cancel_frame(a);
        assert_eq!(q.drain_due(), vec![b]);
    }
}
