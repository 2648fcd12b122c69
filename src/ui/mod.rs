//! Rendering surface.
//!
//! The table, players and dealer report every visible change through
//! `UserInterface`. Implementations are called from several threads at once
//! and must not block for long: the table calls them while holding its lock.
//!
//! - `TracingUi`: emits each call as a structured `tracing` event
//! - `RecordingUi`: keeps every call in memory, for tests and replays

pub mod recording;
pub mod tracing_ui;

pub use recording::{RecordingUi, UiEvent};
pub use tracing_ui::TracingUi;

use crate::cards::{Card, Slot};
use crate::core::PlayerId;

/// Outbound calls the runtime makes to whatever draws the game.
pub trait UserInterface: Send + Sync {
    fn place_card(&self, card: Card, slot: Slot);

    fn remove_card(&self, slot: Slot);

    fn place_token(&self, player: PlayerId, slot: Slot);

    fn remove_token(&self, player: PlayerId, slot: Slot);

    fn set_score(&self, player: PlayerId, score: u32);

    /// Remaining freeze; `0` means the player is no longer frozen.
    fn set_freeze(&self, player: PlayerId, millis: u64);

    /// Countdown mode. `warn` is set once the remainder is below the warning
    /// threshold.
    fn set_countdown(&self, millis: u64, warn: bool);

    /// Elapsed-time mode.
    fn set_elapsed(&self, millis: u64);

    fn announce_winners(&self, winners: &[PlayerId]);
}
