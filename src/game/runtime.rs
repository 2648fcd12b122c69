//! Assembling a game and running its dealer thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use super::outcome::GameOutcome;
use crate::cards::{FeatureOracle, SetOracle, Slot};
use crate::core::{GameConfig, PlayerId};
use crate::dealer::{ClaimQueue, Dealer, DealerHandle};
use crate::error::GameError;
use crate::player::Player;
use crate::table::Table;
use crate::ui::UserInterface;

/// A fully wired game that has not started yet.
///
/// ```no_run
/// use std::sync::Arc;
/// use set_dealer::{Game, GameConfig, TracingUi};
///
/// let game = Game::new(GameConfig::default(), Arc::new(TracingUi::new())).unwrap();
/// let handle = game.start().unwrap();
/// handle.terminate();
/// let outcome = handle.join().unwrap();
/// println!("winners: {:?}", outcome.winners);
/// ```
#[derive(Debug)]
pub struct Game {
    config: Arc<GameConfig>,
    dealer: Dealer,
}

impl Game {
    /// Validate `config` and build the table, players and dealer with the
    /// standard feature oracle.
    pub fn new(config: GameConfig, ui: Arc<dyn UserInterface>) -> Result<Self, GameError> {
        let oracle = Arc::new(FeatureOracle::from_config(&config));
        Self::with_oracle(config, ui, oracle)
    }

    /// Like [`Game::new`], judging sets with `oracle`.
    pub fn with_oracle(
        config: GameConfig,
        ui: Arc<dyn UserInterface>,
        oracle: Arc<dyn SetOracle>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let config = Arc::new(config);
        let table = Arc::new(Table::new(&config, Arc::clone(&ui)));
        let claims = Arc::new(ClaimQueue::new(config.player_count()));
        let players = PlayerId::all(config.player_count())
            .map(|id| {
                Arc::new(Player::new(
                    id,
                    &config,
                    Arc::clone(&table),
                    Arc::clone(&claims),
                    Arc::clone(&ui),
                ))
            })
            .collect();
        let dealer = Dealer::new(Arc::clone(&config), table, players, claims, oracle, ui);
        Ok(Self { config, dealer })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn dealer(&self) -> &Dealer {
        &self.dealer
    }

    /// Take the dealer to drive it step by step instead of on its thread.
    #[must_use]
    pub fn into_dealer(self) -> Dealer {
        self.dealer
    }

    /// Spawn the dealer thread. The dealer starts every player in turn.
    pub fn start(self) -> Result<GameHandle, GameError> {
        let dealer = self.dealer.handle();
        let table = Arc::clone(self.dealer.table());
        let players = self.dealer.players().to_vec();
        let game = self.dealer;
        let thread = thread::Builder::new()
            .name("dealer".into())
            .spawn(move || game.run())?;
        info!(players = players.len(), "game started");
        Ok(GameHandle {
            dealer,
            table,
            players,
            thread,
        })
    }

    /// Play to completion on a dealer thread and return the outcome.
    pub fn run(self) -> Result<GameOutcome, GameError> {
        self.start()?.join()
    }
}

/// Control over a game in progress.
#[derive(Debug)]
pub struct GameHandle {
    dealer: DealerHandle,
    table: Arc<Table>,
    players: Vec<Arc<Player>>,
    thread: JoinHandle<Result<GameOutcome, GameError>>,
}

impl GameHandle {
    /// Forward a key press from an input device. Returns whether the
    /// player accepted it.
    pub fn key_pressed(&self, player: PlayerId, slot: Slot) -> bool {
        self.player(player).is_some_and(|p| p.key_pressed(slot))
    }

    /// Ask the dealer to end the game.
    pub fn terminate(&self) {
        self.dealer.terminate();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    #[must_use]
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&Arc<Player>> {
        self.players.get(player.index())
    }

    #[must_use]
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    /// Wait for the dealer thread and return its outcome.
    pub fn join(self) -> Result<GameOutcome, GameError> {
        self.thread.join().unwrap_or_else(|_| {
            error!("dealer thread panicked");
            Err(GameError::ThreadPanicked {
                thread: "dealer".into(),
            })
        })
    }
}
