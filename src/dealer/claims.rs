//! The dealer monitor: claims in arrival order plus the dealer's wake-up.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::core::PlayerId;

/// FIFO of players waiting for adjudication.
///
/// Players enqueue with `submit`; the dealer is the only consumer and takes
/// one claim per wake with `next`. Arrival order is adjudication order.
#[derive(Debug)]
pub struct ClaimQueue {
    state: Mutex<ClaimState>,
    changed: Condvar,
    capacity: usize,
}

#[derive(Debug, Default)]
struct ClaimState {
    pending: VecDeque<PlayerId>,
    woken: bool,
    closed: bool,
}

impl ClaimQueue {
    /// A queue holding at most `capacity` claims. One per player suffices,
    /// since a claimer blocks until its verdict.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(ClaimState::default()),
            changed: Condvar::new(),
            capacity: capacity.max(1),
        }
    }

    /// Enqueue a claim and wake the dealer. Blocks while the queue is full.
    /// Returns false if the queue was closed.
    pub fn submit(&self, player: PlayerId) -> bool {
        let mut state = self.state.lock();
        while state.pending.len() >= self.capacity && !state.closed {
            self.changed.wait(&mut state);
        }
        if state.closed {
            return false;
        }
        state.pending.push_back(player);
        self.changed.notify_all();
        true
    }

    /// Pop the oldest claim, waiting up to `timeout` for one to arrive.
    ///
    /// Returns early with `None` after `wake` or `close`.
    pub fn next(&self, timeout: Duration) -> Option<PlayerId> {
        let mut state = self.state.lock();
        if state.pending.is_empty() && !state.woken && !state.closed {
            let _ = self.changed.wait_for(&mut state, timeout);
        }
        state.woken = false;
        let claim = state.pending.pop_front();
        if claim.is_some() {
            self.changed.notify_all();
        }
        claim
    }

    /// Interrupt the dealer's current or next wait.
    pub fn wake(&self) {
        let mut state = self.state.lock();
        state.woken = true;
        self.changed.notify_all();
    }

    /// Remove every pending claim, oldest first.
    pub fn drain(&self) -> Vec<PlayerId> {
        let mut state = self.state.lock();
        let drained: Vec<_> = state.pending.drain(..).collect();
        self.changed.notify_all();
        drained
    }

    /// Remove the pending claims matching `pred`, keeping the others in order.
    pub fn remove_where(&self, mut pred: impl FnMut(PlayerId) -> bool) -> Vec<PlayerId> {
        let mut state = self.state.lock();
        let mut removed = Vec::new();
        state.pending.retain(|&p| {
            if pred(p) {
                removed.push(p);
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            self.changed.notify_all();
        }
        removed
    }

    /// Refuse further claims and release anyone blocked in `submit`.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.changed.notify_all();
    }

    #[must_use]
    pub fn pending(&self) -> Vec<PlayerId> {
        self.state.lock().pending.iter().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
