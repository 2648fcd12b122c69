//! Raw grid state guarded by the table lock.

use smallvec::SmallVec;

use crate::cards::{Card, Slot};
use crate::core::{PlayerId, PlayerMap};

/// A player's tokens in placement order.
pub type TokenList = SmallVec<[Slot; 3]>;

/// Slot/card maps and per-player tokens.
///
/// Each player's ordered token list is the single record of where that
/// player has tokens; "player `p` has a token on `s`" means `s` is in
/// `tokens[p]`.
#[derive(Clone, Debug)]
pub struct Grid {
    slot_to_card: Vec<Option<Card>>,
    card_to_slot: Vec<Option<Slot>>,
    tokens: PlayerMap<TokenList>,
}

impl Grid {
    pub(crate) fn new(table_size: usize, deck_size: usize, player_count: usize) -> Self {
        Self {
            slot_to_card: vec![None; table_size],
            card_to_slot: vec![None; deck_size],
            tokens: PlayerMap::with_default(player_count),
        }
    }

    #[must_use]
    pub fn table_size(&self) -> usize {
        self.slot_to_card.len()
    }

    /// Number of distinct card codes the grid accepts.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.card_to_slot.len()
    }

    #[must_use]
    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.slot_to_card.get(slot.index()).copied().flatten()
    }

    #[must_use]
    pub fn slot_of(&self, card: Card) -> Option<Slot> {
        self.card_to_slot.get(card.index()).copied().flatten()
    }

    #[must_use]
    pub fn tokens(&self, player: PlayerId) -> &[Slot] {
        &self.tokens[player]
    }

    #[must_use]
    pub fn has_token(&self, player: PlayerId, slot: Slot) -> bool {
        self.tokens[player].contains(&slot)
    }

    #[must_use]
    pub fn count_cards(&self) -> usize {
        self.slot_to_card.iter().filter(|c| c.is_some()).count()
    }

    /// Cards currently on the grid, in slot order.
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.slot_to_card.iter().flatten().copied().collect()
    }

    pub fn empty_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slot_to_card
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| Slot(i as u16))
    }

    pub(crate) fn set_card(&mut self, card: Card, slot: Slot) {
        self.slot_to_card[slot.index()] = Some(card);
        self.card_to_slot[card.index()] = Some(slot);
    }

    pub(crate) fn take_card(&mut self, slot: Slot) -> Option<Card> {
        let card = self.slot_to_card.get_mut(slot.index())?.take()?;
        self.card_to_slot[card.index()] = None;
        Some(card)
    }

    pub(crate) fn push_token(&mut self, player: PlayerId, slot: Slot) {
        self.tokens[player].push(slot);
    }

    pub(crate) fn drop_token(&mut self, player: PlayerId, slot: Slot) -> bool {
        let tokens = &mut self.tokens[player];
        match tokens.iter().position(|&s| s == slot) {
            Some(pos) => {
                tokens.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Players holding a token on `slot`.
    pub(crate) fn holders(&self, slot: Slot) -> Vec<PlayerId> {
        self.tokens
            .iter()
            .filter(|(_, tokens)| tokens.contains(&slot))
            .map(|(p, _)| p)
            .collect()
    }

    /// Check the map inverse, token and bound invariants.
    #[must_use]
    pub fn is_consistent(&self, set_size: usize) -> bool {
        let maps_agree = self.slot_to_card.iter().enumerate().all(|(s, card)| match card {
            Some(c) => self.card_to_slot.get(c.index()) == Some(&Some(Slot(s as u16))),
            None => true,
        }) && self.card_to_slot.iter().enumerate().all(|(c, slot)| match slot {
            Some(s) => self.slot_to_card.get(s.index()) == Some(&Some(Card(c as u32))),
            None => true,
        });

        let tokens_ok = self.tokens.values().all(|tokens| {
            let mut seen = tokens.clone();
            seen.sort_unstable();
            seen.dedup();
            tokens.len() <= set_size
                && seen.len() == tokens.len()
                && tokens.iter().all(|&s| self.card_at(s).is_some())
        });

        maps_agree && tokens_ok
    }
}
