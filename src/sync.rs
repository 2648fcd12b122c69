//! Interruptible blocking primitives.
//!
//! Threads cannot be interrupted from outside, so every blocking point in
//! the runtime waits on one of these. Closing or triggering wakes all
//! waiters, and they observe the shutdown instead of hanging.
//!
//! - `Inbox<T>`: bounded FIFO, non-blocking `offer`, blocking `take`
//! - `Mailbox<T>`: single-slot hand-off, one value per round trip
//! - `Latch`: one-way flag with timed waits, used for sleeps

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Bounded FIFO with a single blocking consumer.
#[derive(Debug)]
pub struct Inbox<T> {
    state: Mutex<InboxState<T>>,
    available: Condvar,
    capacity: usize,
}

#[derive(Debug)]
struct InboxState<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> Inbox<T> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(InboxState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            available: Condvar::new(),
            capacity,
        }
    }

    /// Enqueue without blocking. Returns false when full or closed.
    pub fn offer(&self, item: T) -> bool {
        let mut state = self.state.lock();
        if state.closed || state.items.len() >= self.capacity {
            return false;
        }
        state.items.push_back(item);
        self.available.notify_one();
        true
    }

    /// Block until an item arrives. `None` once the inbox is closed.
    pub fn take(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            self.available.wait(&mut state);
        }
    }

    /// Drop every pending item, returning how many were discarded.
    pub fn clear(&self) -> usize {
        let mut state = self.state.lock();
        let dropped = state.items.len();
        state.items.clear();
        dropped
    }

    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.items.clear();
        self.available.notify_all();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Single-slot channel from the dealer to one player.
#[derive(Debug)]
pub struct Mailbox<T> {
    state: Mutex<MailboxState<T>>,
    ready: Condvar,
}

#[derive(Debug)]
struct MailboxState<T> {
    value: Option<T>,
    closed: bool,
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mailbox<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MailboxState {
                value: None,
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Deliver a value. Returns false if the slot is occupied or closed.
    pub fn post(&self, value: T) -> bool {
        let mut state = self.state.lock();
        if state.closed || state.value.is_some() {
            return false;
        }
        state.value = Some(value);
        self.ready.notify_all();
        true
    }

    /// Block until a value is posted. A value posted before `close` is still
    /// delivered; after that, `None`.
    pub fn take(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(value) = state.value.take() {
                return Some(value);
            }
            if state.closed {
                return None;
            }
            self.ready.wait(&mut state);
        }
    }

    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.ready.notify_all();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

/// One-way flag. Once triggered it stays set and wakes every sleeper.
#[derive(Debug, Default)]
pub struct Latch {
    set: Mutex<bool>,
    cvar: Condvar,
}

impl Latch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        let mut set = self.set.lock();
        *set = true;
        self.cvar.notify_all();
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        *self.set.lock()
    }

    /// Sleep for `timeout` unless triggered first. Returns whether the latch
    /// is set.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut set = self.set.lock();
        while !*set {
            if self.cvar.wait_until(&mut set, deadline).timed_out() {
                break;
            }
        }
        *set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_inbox_is_bounded_fifo() {
        let inbox = Inbox::new(2);
        assert!(inbox.offer(1));
        assert!(inbox.offer(2));
        assert!(!inbox.offer(3));
        assert_eq!(inbox.len(), 2);

        assert_eq!(inbox.take(), Some(1));
        assert_eq!(inbox.take(), Some(2));
        assert!(inbox.is_empty());
    }

    #[test]
    fn test_inbox_clear() {
        let inbox = Inbox::new(3);
        inbox.offer('a');
        inbox.offer('b');
        assert_eq!(inbox.clear(), 2);
        assert!(inbox.offer('c'));
        assert_eq!(inbox.take(), Some('c'));
    }

    #[test]
    fn test_inbox_close_wakes_taker() {
        let inbox: Arc<Inbox<u8>> = Arc::new(Inbox::new(3));
        let taker = {
            let inbox = Arc::clone(&inbox);
            thread::spawn(move || inbox.take())
        };

        thread::sleep(Duration::from_millis(20));
        inbox.close();

        assert_eq!(taker.join().unwrap(), None);
        assert!(!inbox.offer(1));
    }

    #[test]
    fn test_mailbox_single_slot() {
        let mailbox = Mailbox::new();
        assert!(mailbox.post(7));
        assert!(!mailbox.post(8));
        assert_eq!(mailbox.take(), Some(7));
        assert!(mailbox.post(9));
        assert_eq!(mailbox.take(), Some(9));
    }

    #[test]
    fn test_mailbox_delivers_across_threads() {
        let mailbox: Arc<Mailbox<&'static str>> = Arc::new(Mailbox::new());
        let waiter = {
            let mailbox = Arc::clone(&mailbox);
            thread::spawn(move || mailbox.take())
        };

        thread::sleep(Duration::from_millis(20));
        mailbox.post("point");
        assert_eq!(waiter.join().unwrap(), Some("point"));
    }

    #[test]
    fn test_mailbox_close_keeps_posted_value() {
        let mailbox = Mailbox::new();
        mailbox.post(1);
        mailbox.close();
        assert!(mailbox.is_closed());
        assert_eq!(mailbox.take(), Some(1));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_latch_times_out_then_triggers() {
        let latch = Arc::new(Latch::new());
        assert!(!latch.wait_timeout(Duration::from_millis(10)));

        let sleeper = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || {
                let start = Instant::now();
                let set = latch.wait_timeout(Duration::from_secs(10));
                (set, start.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(20));
        latch.trigger();

        let (set, elapsed) = sleeper.join().unwrap();
        assert!(set);
        assert!(elapsed < Duration::from_secs(5));
        assert!(latch.is_set());
    }
}
