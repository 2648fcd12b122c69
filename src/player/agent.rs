//! The player agent: inbox, control loop and claim protocol.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::computer;
use crate::cards::Slot;
use crate::core::{GameConfig, GameRng, PlayerId, PlayerKind};
use crate::dealer::ClaimQueue;
use crate::sync::{Inbox, Latch, Mailbox};
use crate::table::{Table, Toggle};
use crate::ui::UserInterface;

/// Freeze display refresh.
pub const FREEZE_TICK: Duration = Duration::from_millis(900);

/// The dealer's answer to a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Legal set: score and point freeze.
    Point,
    /// Not a set: penalty freeze.
    Penalty,
    /// The claim's cards were removed before adjudication. No freeze.
    Cancel,
}

/// Where a player is in its claim cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PlayerState {
    Idle = 0,
    FrozenPoint = 1,
    FrozenPenalty = 2,
    AwaitingVerdict = 3,
}

impl PlayerState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => PlayerState::FrozenPoint,
            2 => PlayerState::FrozenPenalty,
            3 => PlayerState::AwaitingVerdict,
            _ => PlayerState::Idle,
        }
    }
}

/// One participant.
///
/// Key presses arrive on any thread through `key_pressed` and queue in the
/// inbox; the control thread applies them to the table one at a time. When
/// the player's third token goes down it claims, blocks for the dealer's
/// verdict, and serves the matching freeze.
pub struct Player {
    id: PlayerId,
    kind: PlayerKind,
    table_size: usize,
    set_size: usize,
    point_freeze: Duration,
    penalty_freeze: Duration,
    key_interval: Duration,
    table: Arc<Table>,
    claims: Arc<ClaimQueue>,
    ui: Arc<dyn UserInterface>,
    inbox: Inbox<Slot>,
    mailbox: Mailbox<Verdict>,
    state: AtomicU8,
    score: AtomicU32,
    terminate: Latch,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state())
            .field("score", &self.score())
            .finish_non_exhaustive()
    }
}

impl Player {
    #[must_use]
    pub fn new(
        id: PlayerId,
        config: &GameConfig,
        table: Arc<Table>,
        claims: Arc<ClaimQueue>,
        ui: Arc<dyn UserInterface>,
    ) -> Self {
        Self {
            id,
            kind: config.player_kind(id),
            table_size: config.table_size,
            set_size: config.set_size,
            point_freeze: config.point_freeze(),
            penalty_freeze: config.penalty_freeze(),
            key_interval: config.key_interval(),
            table,
            claims,
            ui,
            inbox: Inbox::new(config.set_size),
            mailbox: Mailbox::new(),
            state: AtomicU8::new(PlayerState::Idle as u8),
            score: AtomicU32::new(0),
            terminate: Latch::new(),
            threads: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn state(&self) -> PlayerState {
        PlayerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: PlayerState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// Presses waiting in the inbox.
    #[must_use]
    pub fn pending_presses(&self) -> usize {
        self.inbox.len()
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminate.is_set()
    }

    #[must_use]
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Sleep unless terminated first. Returns whether the player terminated.
    pub(crate) fn sleep(&self, duration: Duration) -> bool {
        self.terminate.wait_timeout(duration)
    }

    /// Offer a key press. Never blocks.
    ///
    /// Accepted only while the table is ready, the player is idle and the
    /// inbox has room; otherwise dropped.
    pub fn key_pressed(&self, slot: Slot) -> bool {
        if slot.index() >= self.table_size
            || !self.table.is_ready()
            || self.state() != PlayerState::Idle
            || self.terminate.is_set()
        {
            return false;
        }
        self.inbox.offer(slot)
    }

    /// Start the control thread, plus the key generator for a computer
    /// player, which draws from `rng`.
    pub fn start(self: &Arc<Self>, rng: GameRng) -> std::io::Result<()> {
        let mut threads = self.threads.lock();

        let me = Arc::clone(self);
        threads.push(
            thread::Builder::new()
                .name(format!("player-{}", self.id.0))
                .spawn(move || me.run())?,
        );

        if self.kind == PlayerKind::Computer {
            let me = Arc::clone(self);
            threads.push(
                thread::Builder::new()
                    .name(format!("computer-{}", self.id.0))
                    .spawn(move || computer::press_keys(&me, rng, me.key_interval))?,
            );
        }
        Ok(())
    }

    /// The control loop. Returns once terminated.
    pub fn run(&self) {
        info!(player = self.id.0, "thread starting");
        while !self.terminate.is_set() {
            let Some(slot) = self.inbox.take() else {
                break;
            };
            if let Toggle::Placed { tokens } = self.table.toggle_token(self.id, slot) {
                if tokens >= self.set_size {
                    self.claim();
                }
            }
        }
        info!(player = self.id.0, "thread terminated");
    }

    /// Queue a claim, wait for the verdict and serve it.
    fn claim(&self) {
        self.set_state(PlayerState::AwaitingVerdict);
        debug!(player = self.id.0, tokens = ?self.table.tokens(self.id), "claim");

        if !self.claims.submit(self.id) {
            self.set_state(PlayerState::Idle);
            return;
        }
        let Some(verdict) = self.mailbox.take() else {
            self.set_state(PlayerState::Idle);
            return;
        };
        debug!(player = self.id.0, ?verdict, "verdict");

        match verdict {
            Verdict::Point => self.point(),
            Verdict::Penalty => self.penalty(),
            Verdict::Cancel => {}
        }
        self.set_state(PlayerState::Idle);
    }

    /// Score, then freeze. The dealer has already removed the claimed cards
    /// and with them this player's tokens.
    fn point(&self) {
        let score = self.score.fetch_add(1, Ordering::SeqCst) + 1;
        self.ui.set_score(self.id, score);
        self.set_state(PlayerState::FrozenPoint);
        self.freeze(self.point_freeze);
    }

    fn penalty(&self) {
        self.table.clear_tokens(self.id);
        self.set_state(PlayerState::FrozenPenalty);
        self.freeze(self.penalty_freeze);
    }

    /// Sleep for `duration`, refreshing the freeze display at least once a
    /// second. Ends early on termination.
    fn freeze(&self, duration: Duration) {
        let until = Instant::now() + duration;
        loop {
            let remaining = until.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            self.ui.set_freeze(self.id, remaining.as_millis() as u64);
            if self.terminate.wait_timeout(remaining.min(FREEZE_TICK)) {
                break;
            }
        }
        self.ui.set_freeze(self.id, 0);
    }

    /// Hand this player the verdict on its claim.
    pub fn deliver(&self, verdict: Verdict) -> bool {
        self.mailbox.post(verdict)
    }

    /// Drop unprocessed presses. Called by the dealer on a structural reset.
    pub fn discard_presses(&self) -> usize {
        self.inbox.clear()
    }

    /// Stop the player's threads and wait for them.
    pub fn terminate(&self) {
        self.terminate.trigger();
        self.inbox.close();
        self.mailbox.close();

        let handles: Vec<_> = self.threads.lock().drain(..).collect();
        for handle in handles {
            let name = handle.thread().name().unwrap_or("player").to_owned();
            if handle.join().is_err() {
                error!(thread = %name, "thread panicked");
            }
        }
    }
}
