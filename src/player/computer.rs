//! Simulated input: uniformly random key presses.

use std::time::Duration;

use tracing::info;

use super::agent::Player;
use crate::cards::Slot;
use crate::core::GameRng;

/// Press random slots every `interval` until the player terminates.
///
/// Presses that the player refuses (frozen, table not ready, inbox full)
/// are simply lost, like a human hammering keys.
pub fn press_keys(player: &Player, mut rng: GameRng, interval: Duration) {
    info!(player = player.id().0, "key generator starting");
    let table_size = player.table_size();
    while !player.is_terminated() {
        let slot = Slot(rng.gen_range_usize(0..table_size) as u16);
        player.key_pressed(slot);
        if player.sleep(interval) {
            break;
        }
    }
    info!(player = player.id().0, "key generator terminated");
}
