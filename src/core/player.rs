//! Seats at the table.
//!
//! `PlayerId` names a seat; ids run from 0 in seat order. `PlayerMap`
//! stores one value per seat: the grid keeps token lists in one and the
//! finished game reports scores in another.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A seat, `0..player_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every seat of a `player_count`-player game, lowest first.
    ///
    /// ```
    /// use set_dealer::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).rev().collect();
    /// assert_eq!(seats, vec![PlayerId::new(2), PlayerId::new(1), PlayerId::new(0)]);
    /// ```
    pub fn all(player_count: usize) -> impl DoubleEndedIterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Exactly one `T` per seat.
///
/// ```
/// use set_dealer::core::{PlayerId, PlayerMap};
///
/// let mut scores: PlayerMap<u32> = PlayerMap::with_value(2, 0);
/// scores[PlayerId::new(1)] += 1;
/// assert_eq!(scores.values().sum::<u32>(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build each seat's value from its id.
    ///
    /// # Panics
    ///
    /// If `player_count` is outside `1..=255`. Validated configs never are.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(
            (1..=255).contains(&player_count),
            "player count {player_count} outside 1..=255"
        );
        Self {
            data: PlayerId::all(player_count).map(factory).collect(),
        }
    }

    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// `(seat, value)` pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all(self.data.len()).zip(self.data.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_order_and_display() {
        let seats: Vec<_> = PlayerId::all(4).collect();
        assert!(seats.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seats[3].index(), 3);
        assert_eq!(PlayerId::new(2).to_string(), "Player 2");
    }

    #[test]
    fn test_map_built_from_seat() {
        let map = PlayerMap::new(3, |p| u32::from(p.0) * 10);
        assert_eq!(map.player_count(), 3);
        assert_eq!(map[PlayerId::new(2)], 20);
    }

    #[test]
    fn test_scores_update_in_place() {
        let mut scores = PlayerMap::with_value(3, 0u32);
        scores[PlayerId::new(0)] += 2;
        scores[PlayerId::new(2)] += 2;

        let best: Vec<_> = scores
            .iter()
            .filter(|(_, s)| **s == 2)
            .map(|(p, _)| p)
            .collect();
        assert_eq!(best, vec![PlayerId::new(0), PlayerId::new(2)]);
    }

    #[test]
    fn test_map_json_round_trip() {
        let map: PlayerMap<u32> = PlayerMap::new(2, |p| u32::from(p.0) + 5);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"data":[5,6]}"#);
        assert_eq!(serde_json::from_str::<PlayerMap<u32>>(&json).unwrap(), map);
    }

    #[test]
    #[should_panic(expected = "outside 1..=255")]
    fn test_empty_table_is_rejected() {
        let _: PlayerMap<Vec<u8>> = PlayerMap::with_default(0);
    }
}
