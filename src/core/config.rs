//! Game configuration.
//!
//! Read once at startup, validated, then shared read-only by every thread.
//! Missing fields in a config file fall back to the standard game:
//! an 81-card deck, a 3x4 table and sets of three.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::PlayerId;
use crate::error::ConfigError;

/// How a seat receives key presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Presses arrive from an external input source.
    Human,
    /// A key generator thread presses random slots.
    Computer,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of distinct cards.
    pub deck_size: usize,

    /// Number of slots on the grid.
    pub table_size: usize,

    /// Cards per set (and tokens per player).
    pub set_size: usize,

    /// Features per card.
    pub feature_count: usize,

    /// Values each feature can take.
    pub feature_values: usize,

    /// One entry per seat.
    pub players: Vec<PlayerKind>,

    /// Negative: no timer. Zero: elapsed-time display. Positive: countdown
    /// that forces a reshuffle on expiry.
    pub turn_timeout_millis: i64,

    /// Remaining countdown below which the display switches to warning.
    pub turn_timeout_warning_millis: u64,

    pub point_freeze_millis: u64,

    pub penalty_freeze_millis: u64,

    /// Pause between two presses of a computer player.
    pub computer_key_interval_millis: u64,

    /// Log the legal sets on the table after every deal.
    pub hints: bool,

    /// Seed for deck shuffles and computer players. Random when unset.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            deck_size: 81,
            table_size: 12,
            set_size: 3,
            feature_count: 4,
            feature_values: 3,
            players: vec![PlayerKind::Computer; 2],
            turn_timeout_millis: 60_000,
            turn_timeout_warning_millis: 5_000,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 3_000,
            computer_key_interval_millis: 3,
            hints: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Replace the seats with `count` players of the same kind.
    #[must_use]
    pub fn with_players(mut self, count: usize, kind: PlayerKind) -> Self {
        self.players = vec![kind; count];
        self
    }

    #[must_use]
    pub fn with_player_kinds(mut self, kinds: Vec<PlayerKind>) -> Self {
        self.players = kinds;
        self
    }

    #[must_use]
    pub fn with_deck_size(mut self, deck_size: usize) -> Self {
        self.deck_size = deck_size;
        self
    }

    #[must_use]
    pub fn with_table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }

    #[must_use]
    pub fn with_turn_timeout(mut self, millis: i64) -> Self {
        self.turn_timeout_millis = millis;
        self
    }

    #[must_use]
    pub fn with_warning(mut self, millis: u64) -> Self {
        self.turn_timeout_warning_millis = millis;
        self
    }

    #[must_use]
    pub fn with_freezes(mut self, point_millis: u64, penalty_millis: u64) -> Self {
        self.point_freeze_millis = point_millis;
        self.penalty_freeze_millis = penalty_millis;
        self
    }

    #[must_use]
    pub fn with_key_interval(mut self, millis: u64) -> Self {
        self.computer_key_interval_millis = millis;
        self
    }

    #[must_use]
    pub fn with_hints(mut self, hints: bool) -> Self {
        self.hints = hints;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration before any thread starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.set_size != 3 {
            return Err(ConfigError::UnsupportedSetSize(self.set_size));
        }
        if self.feature_values != 3 {
            return Err(ConfigError::UnsupportedFeatureValues(self.feature_values));
        }
        if self.feature_count == 0 {
            return Err(ConfigError::NoFeatures);
        }
        if self.deck_size == 0 {
            return Err(ConfigError::EmptyDeck);
        }
        // Card codes are u32, slots are u16.
        let max = u32::try_from(self.feature_count)
            .ok()
            .and_then(|count| self.feature_values.checked_pow(count))
            .unwrap_or(usize::MAX)
            .min(u32::MAX as usize);
        if self.deck_size > max {
            return Err(ConfigError::DeckTooLarge {
                deck_size: self.deck_size,
                max,
            });
        }
        if self.table_size < self.set_size {
            return Err(ConfigError::TableTooSmall {
                table_size: self.table_size,
                set_size: self.set_size,
            });
        }
        if self.table_size > u16::MAX as usize {
            return Err(ConfigError::TableTooLarge {
                table_size: self.table_size,
                max: u16::MAX as usize,
            });
        }
        if self.players.is_empty() || self.players.len() > 255 {
            return Err(ConfigError::PlayerCount(self.players.len()));
        }
        Ok(())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn player_kind(&self, player: PlayerId) -> PlayerKind {
        self.players[player.index()]
    }

    #[must_use]
    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_millis)
    }

    #[must_use]
    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_millis)
    }

    #[must_use]
    pub fn key_interval(&self) -> Duration {
        Duration::from_millis(self.computer_key_interval_millis)
    }
}
