//! # set-dealer
//!
//! A multi-threaded runtime for the card game Set.
//!
//! One dealer thread owns the deck and the turn timer. Each player runs its
//! own control thread, and computer players add a key-press generator. All
//! of them share a single table and a first-come-first-served claim queue.
//!
//! ## Design Principles
//!
//! 1. **One Lock Per Concern**: the table lock covers cards, tokens and
//!    readiness together. The claim queue, inboxes and mailboxes have their
//!    own leaf locks. The dealer always takes the table lock first.
//!
//! 2. **Interruptible Waits**: every blocking call (inbox, mailbox, claim
//!    queue, freeze sleep) returns promptly on termination.
//!
//! 3. **Pluggable Edges**: legality comes from a `SetOracle`, rendering goes
//!    to a `UserInterface`. Both are traits so tests can observe and steer.
//!
//! ## Modules
//!
//! - `core`: players, configuration, RNG
//! - `cards`: card codes, slots, the legality oracle
//! - `table`: the shared grid and its guard
//! - `ui`: the rendering trait plus tracing and recording implementations
//! - `sync`: inbox, mailbox and latch primitives
//! - `player`: player agents and the computer key generator
//! - `dealer`: claim queue, turn timer and the dealer loop
//! - `game`: assembly, the dealer thread and the outcome

pub mod core;
pub mod cards;
pub mod table;
pub mod ui;
pub mod sync;
pub mod player;
pub mod dealer;
pub mod game;
pub mod error;

// Re-export commonly used types
pub use crate::core::{GameConfig, GameRng, PlayerId, PlayerKind, PlayerMap};

pub use crate::cards::{Card, FeatureOracle, SetOracle, Slot};

pub use crate::table::{Grid, Table, TableGuard, Toggle};

pub use crate::ui::{RecordingUi, TracingUi, UiEvent, UserInterface};

pub use crate::sync::{Inbox, Latch, Mailbox};

pub use crate::player::{Player, PlayerState, Verdict};

pub use crate::dealer::{ClaimQueue, Dealer, DealerHandle, TimerMode, TurnTimer};

pub use crate::game::{Game, GameHandle, GameOutcome};

pub use crate::error::{ConfigError, GameError};
