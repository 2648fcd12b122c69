//! Seedable randomness for deck shuffles and simulated key presses.
//!
//! The dealer owns one `GameRng` and shuffles the deck with it before every
//! refill. Each computer player gets a fork, so with a configured seed a
//! whole game's deals and key streams replay exactly (thread timing aside).
//!
//! ```
//! use set_dealer::core::GameRng;
//!
//! let mut dealer = GameRng::new(42);
//! let mut computer = dealer.fork();
//!
//! let mut deck: Vec<u32> = (0..81).collect();
//! dealer.shuffle(&mut deck);
//! assert!(computer.gen_range_usize(0..12) < 12);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Golden-ratio step between fork seeds.
const FORK_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// ChaCha8 stream that remembers its seed and hands out child streams.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    forks: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            forks: 0,
        }
    }

    /// Seeded when `seed` is set, otherwise from OS entropy. The chosen seed
    /// is kept either way so it can be logged and replayed.
    #[must_use]
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(rand::random))
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A child stream for another thread. The n-th fork of a given seed is
    /// always the same stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.forks += 1;
        Self::new(self.seed.wrapping_add(self.forks.wrapping_mul(FORK_STEP)))
    }

    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shuffled_deck(rng: &mut GameRng) -> Vec<u32> {
        let mut deck: Vec<u32> = (0..81).collect();
        rng.shuffle(&mut deck);
        deck
    }

    #[test]
    fn test_same_seed_same_deals() {
        let mut a = GameRng::new(2024);
        let mut b = GameRng::new(2024);
        for _ in 0..3 {
            assert_eq!(shuffled_deck(&mut a), shuffled_deck(&mut b));
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut deck = shuffled_deck(&mut GameRng::new(1));
        assert_ne!(deck, (0..81).collect::<Vec<_>>());
        deck.sort_unstable();
        assert_eq!(deck, (0..81).collect::<Vec<_>>());
    }

    #[test]
    fn test_computer_forks_replay_but_differ() {
        let mut dealer1 = GameRng::new(7);
        let mut dealer2 = GameRng::new(7);
        let mut first = dealer1.fork();
        let mut second = dealer1.fork();
        let mut first_again = dealer2.fork();

        let presses = |rng: &mut GameRng| -> Vec<usize> {
            (0..32).map(|_| rng.gen_range_usize(0..12)).collect()
        };
        let stream = presses(&mut first);
        assert_eq!(stream, presses(&mut first_again));
        assert_ne!(stream, presses(&mut second));
        assert!(stream.iter().all(|&slot| slot < 12));
    }

    #[test]
    fn test_optional_seed_is_kept() {
        assert_eq!(GameRng::from_optional_seed(Some(9)).seed(), 9);
        let random = GameRng::from_optional_seed(None);
        assert_eq!(GameRng::new(random.seed()).seed(), random.seed());
    }
}
