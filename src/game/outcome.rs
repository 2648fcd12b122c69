//! What a finished game reports.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};

/// Final scores and the players sharing the top score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub scores: PlayerMap<u32>,
    pub winners: Vec<PlayerId>,
}

impl GameOutcome {
    #[must_use]
    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores[player]
    }

    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winners.contains(&player)
    }

    #[must_use]
    pub fn is_tie(&self) -> bool {
        self.winners.len() > 1
    }

    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.scores.values().sum()
    }
}
