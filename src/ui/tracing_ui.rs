//! A rendering surface that writes to the log.

use tracing::{debug, info, trace};

use super::UserInterface;
use crate::cards::{Card, Slot};
use crate::core::PlayerId;

/// Logs every UI call under the `set_dealer::ui` target.
///
/// Timer updates arrive several times a second and go out at `trace`;
/// table changes at `debug`; scores and winners at `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingUi;

impl TracingUi {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl UserInterface for TracingUi {
    fn place_card(&self, card: Card, slot: Slot) {
        debug!(target: "set_dealer::ui", card = card.0, slot = slot.0, "place card");
    }

    fn remove_card(&self, slot: Slot) {
        debug!(target: "set_dealer::ui", slot = slot.0, "remove card");
    }

    fn place_token(&self, player: PlayerId, slot: Slot) {
        debug!(target: "set_dealer::ui", player = player.0, slot = slot.0, "place token");
    }

    fn remove_token(&self, player: PlayerId, slot: Slot) {
        debug!(target: "set_dealer::ui", player = player.0, slot = slot.0, "remove token");
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        info!(target: "set_dealer::ui", player = player.0, score, "score");
    }

    fn set_freeze(&self, player: PlayerId, millis: u64) {
        trace!(target: "set_dealer::ui", player = player.0, millis, "freeze");
    }

    fn set_countdown(&self, millis: u64, warn: bool) {
        trace!(target: "set_dealer::ui", millis, warn, "countdown");
    }

    fn set_elapsed(&self, millis: u64) {
        trace!(target: "set_dealer::ui", millis, "elapsed");
    }

    fn announce_winners(&self, winners: &[PlayerId]) {
        let ids: Vec<u8> = winners.iter().map(|p| p.0).collect();
        info!(target: "set_dealer::ui", winners = ?ids, "winners");
    }
}
