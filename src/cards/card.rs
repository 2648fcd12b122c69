//! Card codes and grid slots.

use serde::{Deserialize, Serialize};

/// A card code in `[0, deck_size)`.
///
/// The runtime treats cards as opaque; only the oracle decodes features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card(pub u32);

impl Card {
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Value of feature `feature` under a base-`values` encoding:
    /// `(code / values^feature) mod values`.
    #[must_use]
    pub fn feature(self, feature: usize, values: usize) -> usize {
        let mut code = self.index();
        for _ in 0..feature {
            code /= values;
        }
        code % values
    }

    /// All `count` feature values, least significant first.
    #[must_use]
    pub fn features(self, count: usize, values: usize) -> Vec<usize> {
        let mut code = self.index();
        (0..count)
            .map(|_| {
                let value = code % values;
                code /= values;
                value
            })
            .collect()
    }

    /// Build a card from feature values, least significant first.
    #[must_use]
    pub fn from_features(features: &[usize], values: usize) -> Self {
        let code = features
            .iter()
            .rev()
            .fold(0usize, |acc, &value| acc * values + value);
        Self(code as u32)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A position on the grid, in `[0, table_size)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(pub u16);

impl Slot {
    #[must_use]
    pub const fn new(slot: u16) -> Self {
        Self(slot)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every slot of a table with `table_size` slots.
    pub fn all(table_size: usize) -> impl Iterator<Item = Slot> {
        (0..table_size as u16).map(Slot)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}
