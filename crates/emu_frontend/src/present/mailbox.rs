//! Ready-frame handoff between a producer thread and the presenter
//!
//! Only the newest frame matters: publishing while a frame is still pending
//! replaces it and counts the replaced one as dropped. The mailbox carries a
//! host-side "ready" signal only; the producer must have inserted its GPU
//! fence before calling [`FrameMailbox::publish`].

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::Renderer;

#[derive(Debug, Default)]
struct MailboxState {
    pending: Option<u64>,
    published: u64,
    presented: u64,
    dropped: u64,
    last_presented: Option<u64>,
}

/// Counters describing mailbox traffic
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MailboxStats {
    /// Frames published by the producer
    pub published: u64,
    /// Frames handed to the presenter
    pub presented: u64,
    /// Frames replaced before the presenter took them
    pub dropped: u64,
}

/// Single-slot frame mailbox
#[derive(Debug, Default)]
pub struct FrameMailbox {
    state: Mutex<MailboxState>,
    ready: Condvar,
}

impl FrameMailbox {
    /// Create an empty mailbox
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MailboxState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a completed frame and return its sequence number
    pub fn publish(&self) -> u64 {
        let mut state = self.lock();
        state.published += 1;
        let sequence = state.published;
        if state.pending.replace(sequence).is_some() {
            state.dropped += 1;
        }
        drop(state);

        self.ready.notify_one();
        sequence
    }

    /// Take the pending frame, waiting at most `timeout`
    pub fn take_timeout(&self, timeout: Duration) -> Option<u64> {
        let state = self.lock();
        let (mut state, _) = self
            .ready
            .wait_timeout_while(state, timeout, |state| state.pending.is_none())
            .unwrap_or_else(PoisonError::into_inner);

        let sequence = state.pending.take()?;
        state.presented += 1;
        state.last_presented = Some(sequence);
        Some(sequence)
    }

    /// Sequence number of the last frame handed to the presenter
    pub fn last_presented(&self) -> Option<u64> {
        self.lock().last_presented
    }

    /// Traffic counters
    pub fn stats(&self) -> MailboxStats {
        let state = self.lock();
        MailboxStats {
            published: state.published,
            presented: state.presented,
            dropped: state.dropped,
        }
    }
}

impl Renderer for FrameMailbox {
    fn try_present(&self, timeout: Duration) -> bool {
        self.take_timeout(timeout).is_some()
    }
}
