//! Set legality: the per-feature predicate and exhaustive search.
//!
//! The dealer only talks to the `SetOracle` trait. `FeatureOracle` is the
//! standard rule: three cards form a set when every feature is either the
//! same on all three or different on all three.

use rustc_hash::FxHashSet;

use super::card::Card;
use crate::core::GameConfig;

/// Decides set legality and searches card collections for sets.
///
/// Implementations must be pure: the dealer calls them while holding the
/// table lock.
pub trait SetOracle: Send + Sync {
    /// True iff `cards` are three distinct cards forming a legal set.
    fn is_legal_set(&self, cards: &[Card]) -> bool;

    /// Up to `limit` distinct legal sets drawn from `cards`, each sorted.
    fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<[Card; 3]>;

    /// Any single legal set in `cards`.
    fn find_any(&self, cards: &[Card]) -> Option<[Card; 3]> {
        self.find_sets(cards, 1).into_iter().next()
    }
}

/// Legality over base-3 feature encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureOracle {
    feature_count: usize,
    feature_values: usize,
}

impl FeatureOracle {
    #[must_use]
    pub fn new(feature_count: usize, feature_values: usize) -> Self {
        Self {
            feature_count,
            feature_values,
        }
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.feature_count, config.feature_values)
    }

    /// The unique card that completes a set with `a` and `b`.
    ///
    /// Per feature: equal values stay, distinct values take the third one.
    #[must_use]
    pub fn complete(&self, a: Card, b: Card) -> Card {
        let values = self.feature_values;
        let features: Vec<usize> = a
            .features(self.feature_count, values)
            .into_iter()
            .zip(b.features(self.feature_count, values))
            .map(|(x, y)| if x == y { x } else { (2 * values - x - y) % values })
            .collect();
        Card::from_features(&features, values)
    }
}

impl SetOracle for FeatureOracle {
    fn is_legal_set(&self, cards: &[Card]) -> bool {
        let [a, b, c] = match cards {
            [a, b, c] => [*a, *b, *c],
            _ => return false,
        };
        if a == b || b == c || a == c {
            return false;
        }

        (0..self.feature_count).all(|i| {
            let x = a.feature(i, self.feature_values);
            let y = b.feature(i, self.feature_values);
            let z = c.feature(i, self.feature_values);
            (x == y && y == z) || (x != y && y != z && x != z)
        })
    }

    fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<[Card; 3]> {
        let mut sorted = cards.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let present: FxHashSet<Card> = sorted.iter().copied().collect();

        let mut sets = Vec::new();
        if limit == 0 {
            return sets;
        }
        for (i, &a) in sorted.iter().enumerate() {
            for &b in &sorted[i + 1..] {
                let c = self.complete(a, b);
                // Only report each set once, from its two smallest cards.
                if c > b && present.contains(&c) {
                    sets.push([a, b, c]);
                    if sets.len() >= limit {
                        return sets;
                    }
                }
            }
        }
        sets
    }
}
