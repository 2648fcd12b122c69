//! The shared table and its critical section.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::{info, warn};

use super::grid::{Grid, TokenList};
use crate::cards::{Card, SetOracle, Slot};
use crate::core::{GameConfig, PlayerId};
use crate::ui::UserInterface;

/// Result of a player's key press applied to its own tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    /// The player's token on the slot was taken back.
    Removed { tokens: usize },
    /// A new token went down; `tokens` is the player's count afterwards.
    Placed { tokens: usize },
    /// Nothing changed: empty slot, out of range, or no tokens left.
    Discarded,
}

/// The 3x4 grid shared by the dealer and every player.
///
/// One mutex serializes every mutation, structural or token. `ready` is
/// false while the dealer is restructuring the grid; players read it without
/// the lock to decide whether to accept key presses.
pub struct Table {
    set_size: usize,
    ui: Arc<dyn UserInterface>,
    grid: Mutex<Grid>,
    ready: AtomicBool,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("set_size", &self.set_size)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

impl Table {
    /// An empty table. It stays not-ready until the dealer's first deal.
    #[must_use]
    pub fn new(config: &GameConfig, ui: Arc<dyn UserInterface>) -> Self {
        Self {
            set_size: config.set_size,
            ui,
            grid: Mutex::new(Grid::new(
                config.table_size,
                config.deck_size,
                config.player_count(),
            )),
            ready: AtomicBool::new(false),
        }
    }

    /// Take the table lock without touching `ready`.
    pub fn lock(&self) -> TableGuard<'_> {
        TableGuard {
            table: self,
            grid: self.grid.lock(),
            structural: false,
        }
    }

    /// Take the table lock for a structural change. The table reads as not
    /// ready until the guard drops.
    pub fn structural(&self) -> TableGuard<'_> {
        let mut guard = self.lock();
        guard.begin_structural();
        guard
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn set_ready(&self, ready: bool) {
        let _grid = self.grid.lock();
        self.ready.store(ready, Ordering::SeqCst);
    }

    #[must_use]
    pub fn set_size(&self) -> usize {
        self.set_size
    }

    pub fn place_card(&self, card: Card, slot: Slot) -> bool {
        self.structural().place_card(card, slot)
    }

    pub fn remove_card(&self, slot: Slot) -> Option<Card> {
        self.structural().remove_card(slot)
    }

    /// Put a token down. Requires a card on the slot and a free token.
    /// Placing on a slot the player already marks is a no-op that succeeds.
    pub fn place_token(&self, player: PlayerId, slot: Slot) -> bool {
        let mut grid = self.grid.lock();
        if grid.has_token(player, slot) {
            return true;
        }
        if grid.card_at(slot).is_none() {
            warn!(player = player.0, slot = slot.0, "token refused on empty slot");
            return false;
        }
        if grid.tokens(player).len() >= self.set_size {
            return false;
        }
        grid.push_token(player, slot);
        self.ui.place_token(player, slot);
        true
    }

    /// Take a token back. Returns whether one was there.
    pub fn remove_token(&self, player: PlayerId, slot: Slot) -> bool {
        let mut grid = self.grid.lock();
        let removed = grid.drop_token(player, slot);
        if removed {
            self.ui.remove_token(player, slot);
        }
        removed
    }

    /// Apply one key press: remove the player's token on `slot` if present,
    /// otherwise place one when the slot holds a card and the player has
    /// tokens left.
    pub fn toggle_token(&self, player: PlayerId, slot: Slot) -> Toggle {
        let mut grid = self.grid.lock();
        if slot.index() >= grid.table_size() {
            return Toggle::Discarded;
        }
        if grid.drop_token(player, slot) {
            self.ui.remove_token(player, slot);
            return Toggle::Removed {
                tokens: grid.tokens(player).len(),
            };
        }
        if grid.tokens(player).len() < self.set_size && grid.card_at(slot).is_some() {
            grid.push_token(player, slot);
            self.ui.place_token(player, slot);
            return Toggle::Placed {
                tokens: grid.tokens(player).len(),
            };
        }
        Toggle::Discarded
    }

    /// Take back every token of `player`. Returns how many there were.
    pub fn clear_tokens(&self, player: PlayerId) -> usize {
        let mut grid = self.grid.lock();
        let slots: TokenList = grid.tokens(player).into();
        for &slot in &slots {
            grid.drop_token(player, slot);
            self.ui.remove_token(player, slot);
        }
        slots.len()
    }

    #[must_use]
    pub fn tokens(&self, player: PlayerId) -> TokenList {
        self.grid.lock().tokens(player).into()
    }

    #[must_use]
    pub fn has_token(&self, player: PlayerId, slot: Slot) -> bool {
        self.grid.lock().has_token(player, slot)
    }

    #[must_use]
    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.grid.lock().card_at(slot)
    }

    #[must_use]
    pub fn count_cards(&self) -> usize {
        self.grid.lock().count_cards()
    }

    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.grid.lock().cards()
    }

    /// Log every legal set on the table. Returns them as well.
    pub fn hints(&self, oracle: &dyn SetOracle) -> Vec<[Card; 3]> {
        let grid = self.grid.lock();
        let sets = oracle.find_sets(&grid.cards(), usize::MAX);
        for set in &sets {
            let slots: Vec<u16> = set
                .iter()
                .filter_map(|&c| grid.slot_of(c))
                .map(|s| s.0)
                .collect();
            let cards: Vec<u32> = set.iter().map(|c| c.0).collect();
            info!(?slots, ?cards, "hint");
        }
        sets
    }

    /// Whether the grid currently satisfies its invariants.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.grid.lock().is_consistent(self.set_size)
    }
}

/// Exclusive access to the grid.
///
/// A structural guard marks the table not ready for its whole lifetime and
/// restores readiness when dropped.
pub struct TableGuard<'a> {
    table: &'a Table,
    grid: MutexGuard<'a, Grid>,
    structural: bool,
}

impl TableGuard<'_> {
    /// Mark the table not ready until this guard drops.
    pub fn begin_structural(&mut self) {
        if !self.structural {
            self.table.ready.store(false, Ordering::SeqCst);
            self.structural = true;
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.grid.card_at(slot)
    }

    #[must_use]
    pub fn tokens(&self, player: PlayerId) -> &[Slot] {
        self.grid.tokens(player)
    }

    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.grid.cards()
    }

    #[must_use]
    pub fn empty_slots(&self) -> Vec<Slot> {
        self.grid.empty_slots().collect()
    }

    /// Deal `card` onto an empty `slot`.
    pub fn place_card(&mut self, card: Card, slot: Slot) -> bool {
        if slot.index() >= self.grid.table_size() || self.grid.card_at(slot).is_some() {
            warn!(card = card.0, slot = slot.0, "slot unavailable for card");
            return false;
        }
        if card.index() >= self.grid.deck_size() {
            warn!(card = card.0, "card outside the deck");
            return false;
        }
        if self.grid.slot_of(card).is_some() {
            warn!(card = card.0, slot = slot.0, "card already on the table");
            return false;
        }
        self.grid.set_card(card, slot);
        self.table.ui.place_card(card, slot);
        true
    }

    /// Clear `slot`, along with every player's token on it.
    pub fn remove_card(&mut self, slot: Slot) -> Option<Card> {
        let card = self.grid.take_card(slot)?;
        for player in self.grid.holders(slot) {
            self.grid.drop_token(player, slot);
            self.table.ui.remove_token(player, slot);
        }
        self.table.ui.remove_card(slot);
        Some(card)
    }
}

impl Drop for TableGuard<'_> {
    fn drop(&mut self) {
        if self.structural {
            self.table.ready.store(true, Ordering::SeqCst);
        }
    }
}
