//! The dealer: deals, runs the turn timer and adjudicates claims.

use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use super::claims::ClaimQueue;
use super::timer::{TimerMode, TurnTimer};
use crate::cards::{Card, SetOracle, Slot};
use crate::core::{GameConfig, GameRng, PlayerId, PlayerMap};
use crate::error::GameError;
use crate::game::GameOutcome;
use crate::player::{Player, Verdict};
use crate::sync::Latch;
use crate::table::{Table, TableGuard, TokenList};
use crate::ui::UserInterface;

/// Shared handle used to stop a running dealer from another thread.
#[derive(Clone, Debug)]
pub struct DealerHandle {
    shutdown: Arc<Latch>,
    claims: Arc<ClaimQueue>,
}

impl DealerHandle {
    /// Ask the dealer to end the game. It finishes the current step,
    /// terminates every player and announces winners.
    pub fn terminate(&self) {
        self.shutdown.trigger();
        self.claims.wake();
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.shutdown.is_set()
    }
}

/// Drives the game on its own thread.
///
/// The dealer owns the deck and the turn timer outright. It shares the
/// table and the claim queue with the players, and always takes the table
/// lock before the claim queue lock.
pub struct Dealer {
    config: Arc<GameConfig>,
    table: Arc<Table>,
    players: Vec<Arc<Player>>,
    claims: Arc<ClaimQueue>,
    oracle: Arc<dyn SetOracle>,
    ui: Arc<dyn UserInterface>,
    shutdown: Arc<Latch>,
    deck: Vec<Card>,
    rng: GameRng,
    timer: TurnTimer,
}

impl std::fmt::Debug for Dealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dealer")
            .field("deck", &self.deck.len())
            .field("timer", &self.timer.mode())
            .field("players", &self.players.len())
            .finish_non_exhaustive()
    }
}

impl Dealer {
    /// A dealer holding the full deck in order.
    #[must_use]
    pub fn new(
        config: Arc<GameConfig>,
        table: Arc<Table>,
        players: Vec<Arc<Player>>,
        claims: Arc<ClaimQueue>,
        oracle: Arc<dyn SetOracle>,
        ui: Arc<dyn UserInterface>,
    ) -> Self {
        let deck = (0..config.deck_size as u32).map(Card).collect();
        let rng = GameRng::from_optional_seed(config.seed);
        let timer = TurnTimer::new(TimerMode::from_config(&config), Instant::now());
        Self {
            config,
            table,
            players,
            claims,
            oracle,
            ui,
            shutdown: Arc::new(Latch::new()),
            deck,
            rng,
            timer,
        }
    }

    /// Replace the deck, for deterministic deals.
    #[must_use]
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = deck;
        self
    }

    #[must_use]
    pub fn handle(&self) -> DealerHandle {
        DealerHandle {
            shutdown: Arc::clone(&self.shutdown),
            claims: Arc::clone(&self.claims),
        }
    }

    /// Cards not on the table, in draw order.
    #[must_use]
    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    #[must_use]
    pub fn timer(&self) -> &TurnTimer {
        &self.timer
    }

    #[must_use]
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    #[must_use]
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    #[must_use]
    pub fn claims(&self) -> &Arc<ClaimQueue> {
        &self.claims
    }

    fn is_terminated(&self) -> bool {
        self.shutdown.is_set()
    }

    /// Play a whole game: start the players, deal, run turns until the
    /// cards run out of sets or termination, then tear down.
    pub fn run(mut self) -> Result<GameOutcome, GameError> {
        info!(seed = self.rng.seed(), "dealer thread starting");
        if let Err(err) = self.start_players() {
            warn!(%err, "could not start players");
            self.finish();
            return Err(GameError::Spawn(err));
        }
        self.update_timer(true);

        while !self.should_finish() {
            self.refill();
            self.timer_loop();
            if self.is_terminated() {
                break;
            }
            self.update_timer(true);
            self.full_reset();
        }

        let outcome = self.finish();
        info!(winners = ?outcome.winners, "dealer thread terminated");
        Ok(outcome)
    }

    /// Start every player's threads. Computer players draw from forks of the
    /// dealer's RNG.
    pub fn start_players(&mut self) -> std::io::Result<()> {
        for player in &self.players {
            player.start(self.rng.fork())?;
        }
        Ok(())
    }

    /// True once terminated or when no legal set remains among the deck and
    /// the table together.
    #[must_use]
    pub fn should_finish(&self) -> bool {
        self.is_terminated() || self.no_sets_remain()
    }

    fn no_sets_remain(&self) -> bool {
        let mut remaining = self.deck.clone();
        remaining.extend(self.table.cards());
        self.oracle.find_any(&remaining).is_none()
    }

    /// Sleep-and-adjudicate until the turn ends.
    ///
    /// A turn ends on termination, on countdown expiry, once no set remains
    /// anywhere, or in elapsed mode once the table shows no set. With the
    /// timer hidden only termination or exhaustion ends it.
    pub fn timer_loop(&mut self) {
        while !self.is_terminated() && !self.timer.expired(Instant::now()) {
            self.update_timer(false);
            let claim = self.claims.next(self.timer.next_wait(Instant::now()));
            if self.is_terminated() {
                if let Some(player) = claim {
                    self.deliver(player, Verdict::Cancel);
                }
                break;
            }
            self.update_timer(false);

            if let Some(player) = claim {
                if self.adjudicate(player) == Verdict::Point && self.no_sets_remain() {
                    break;
                }
            }
            if self.timer.mode() == TimerMode::Elapsed
                && self.oracle.find_any(&self.table.cards()).is_none()
            {
                debug!("no set on the table");
                break;
            }
        }
    }

    /// Refresh the timer display, restarting the turn first if `reset`.
    pub fn update_timer(&mut self, reset: bool) {
        let now = Instant::now();
        if reset {
            self.timer.reset(now);
        }
        self.timer.display(now, self.ui.as_ref());
    }

    /// Shuffle the deck and fill every empty slot from it.
    pub fn refill(&mut self) {
        let table = Arc::clone(&self.table);
        let mut guard = table.structural();
        self.deal(&mut guard);
        drop(guard);
        self.log_hints();
    }

    fn deal(&mut self, guard: &mut TableGuard<'_>) {
        self.rng.shuffle(&mut self.deck);
        let mut dealt = 0;
        for slot in guard.empty_slots() {
            let Some(card) = self.deck.pop() else {
                break;
            };
            if guard.place_card(card, slot) {
                dealt += 1;
            } else {
                self.deck.push(card);
            }
        }
        if dealt > 0 {
            debug!(dealt, deck = self.deck.len(), "dealt cards");
        }
    }

    fn log_hints(&self) {
        if self.config.hints {
            self.table.hints(self.oracle.as_ref());
        }
    }

    /// Judge `player`'s claim and deliver the verdict.
    ///
    /// A claim whose tokens no longer cover a full set of cards is cancelled.
    /// On a legal set the cards are removed and replaced, and every pending
    /// claim that used one of them is cancelled.
    pub fn adjudicate(&mut self, player: PlayerId) -> Verdict {
        let Some(claimer) = self.players.get(player.index()).cloned() else {
            warn!(player = player.0, "claim from unknown player");
            return Verdict::Cancel;
        };

        let table = Arc::clone(&self.table);
        let mut guard = table.lock();
        let tokens: TokenList = guard.tokens(player).into();
        let cards: Option<Vec<Card>> = tokens.iter().map(|&s| guard.card_at(s)).collect();

        let cards = match cards {
            Some(cards) if cards.len() == self.config.set_size => cards,
            _ => {
                drop(guard);
                debug!(player = player.0, tokens = tokens.len(), "claim cancelled");
                claimer.deliver(Verdict::Cancel);
                return Verdict::Cancel;
            }
        };

        if !self.oracle.is_legal_set(&cards) {
            drop(guard);
            debug!(player = player.0, ?cards, "illegal set");
            claimer.deliver(Verdict::Penalty);
            return Verdict::Penalty;
        }

        guard.begin_structural();
        let claimed: FxHashSet<Slot> = tokens.iter().copied().collect();
        let overlapping = self
            .claims
            .remove_where(|other| guard.tokens(other).iter().any(|s| claimed.contains(s)));
        for &slot in &tokens {
            guard.remove_card(slot);
        }
        self.deal(&mut guard);
        drop(guard);
        self.log_hints();

        info!(player = player.0, ?cards, "legal set");
        claimer.deliver(Verdict::Point);
        for other in overlapping {
            debug!(player = other.0, "claim cancelled by overlapping set");
            self.deliver(other, Verdict::Cancel);
        }
        self.update_timer(true);
        Verdict::Point
    }

    /// Pop and judge at most one pending claim without waiting.
    pub fn adjudicate_next(&mut self) -> Option<(PlayerId, Verdict)> {
        let player = self.claims.next(std::time::Duration::ZERO)?;
        Some((player, self.adjudicate(player)))
    }

    /// Return every card to the deck, cancel pending claims and drop
    /// unprocessed presses, then restart the turn timer.
    pub fn full_reset(&mut self) {
        let table = Arc::clone(&self.table);
        let mut guard = table.structural();
        let table_size = guard.grid().table_size();
        for slot in Slot::all(table_size) {
            if let Some(card) = guard.remove_card(slot) {
                self.deck.push(card);
            }
        }
        let cancelled = self.claims.drain();
        for player in &self.players {
            player.discard_presses();
        }
        drop(guard);

        for player in cancelled {
            self.deliver(player, Verdict::Cancel);
        }
        debug!(deck = self.deck.len(), "table cleared");
        self.update_timer(true);
    }

    fn deliver(&self, player: PlayerId, verdict: Verdict) {
        if let Some(p) = self.players.get(player.index()) {
            p.deliver(verdict);
        }
    }

    /// Stop every player, newest first, cancelling any claim still queued.
    pub fn terminate_players(&mut self) {
        self.shutdown.trigger();
        self.claims.close();
        for player in self.claims.drain() {
            self.deliver(player, Verdict::Cancel);
        }
        for player in self.players.iter().rev() {
            player.terminate();
        }
    }

    /// Every player whose score equals the highest score.
    pub fn announce_winners(&self) -> Vec<PlayerId> {
        let max = self.players.iter().map(|p| p.score()).max().unwrap_or(0);
        let winners: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.score() == max)
            .map(|p| p.id())
            .collect();
        self.ui.announce_winners(&winners);
        winners
    }

    fn finish(&mut self) -> GameOutcome {
        self.full_reset();
        self.terminate_players();
        let winners = self.announce_winners();
        let scores = PlayerMap::new(self.config.player_count(), |p| {
            self.players.get(p.index()).map_or(0, |player| player.score())
        });
        GameOutcome { scores, winners }
    }
}
