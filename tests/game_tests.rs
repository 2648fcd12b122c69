//! Whole games on the dealer thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use std::sync::atomic::{AtomicUsize, Ordering};

use set_dealer::{
    Card, ConfigError, Game, GameConfig, GameError, PlayerId, PlayerKind, RecordingUi, SetOracle,
    Slot, UiEvent,
};

/// Accepts nothing and finds nothing, counting searches.
#[derive(Default)]
struct BarrenOracle {
    searches: AtomicUsize,
}

impl SetOracle for BarrenOracle {
    fn is_legal_set(&self, _cards: &[Card]) -> bool {
        false
    }

    fn find_sets(&self, _cards: &[Card], _limit: usize) -> Vec<[Card; 3]> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Vec::new()
    }
}

fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = GameConfig::default().with_players(0, PlayerKind::Computer);
    let err = Game::new(config, Arc::new(RecordingUi::new())).unwrap_err();
    assert!(matches!(err, GameError::Config(ConfigError::PlayerCount(0))));
}

#[test]
fn test_game_without_sets_ends_at_once() {
    let config = GameConfig::default()
        .with_players(3, PlayerKind::Computer)
        .with_deck_size(2)
        .with_seed(1);
    let ui = Arc::new(RecordingUi::new());
    let outcome = Game::new(config, ui.clone()).unwrap().run().unwrap();

    assert_eq!(outcome.total_points(), 0);
    assert_eq!(outcome.winners, PlayerId::all(3).collect::<Vec<_>>());
    assert_eq!(ui.winners(), Some(outcome.winners.clone()));
    assert_eq!(ui.count(|e| matches!(e, UiEvent::PlaceCard { .. })), 0);
}

#[test]
fn test_scripted_oracle_decides_game_end() {
    let oracle = Arc::new(BarrenOracle::default());
    let config = GameConfig::default().with_players(2, PlayerKind::Human).with_seed(3);
    let ui = Arc::new(RecordingUi::new());
    let outcome = Game::with_oracle(config, ui.clone(), oracle.clone())
        .unwrap()
        .run()
        .unwrap();

    assert!(oracle.searches.load(Ordering::SeqCst) >= 1);
    assert_eq!(outcome.winners, vec![PlayerId::new(0), PlayerId::new(1)]);
    assert_eq!(ui.count(|e| matches!(e, UiEvent::PlaceCard { .. })), 0);
}

#[test]
fn test_last_set_ends_the_game() {
    // A three-card deck is exactly one set.
    let config = GameConfig::default()
        .with_players(1, PlayerKind::Human)
        .with_deck_size(3)
        .with_freezes(0, 0)
        .with_seed(5);
    let ui = Arc::new(RecordingUi::new());
    let handle = Game::new(config, ui.clone()).unwrap().start().unwrap();
    let p0 = PlayerId::new(0);

    let table = Arc::clone(handle.table());
    assert!(wait_until(Duration::from_secs(5), || table.is_ready() && table.count_cards() == 3));
    let occupied: Vec<Slot> = Slot::all(12).filter(|&s| table.card_at(s).is_some()).collect();
    for slot in occupied {
        assert!(handle.key_pressed(p0, slot));
    }

    assert!(wait_until(Duration::from_secs(5), || handle.is_finished()));
    let outcome = handle.join().unwrap();
    assert_eq!(outcome.score(p0), 1);
    assert_eq!(outcome.winners, vec![p0]);
    assert_eq!(table.count_cards(), 0);
    assert_eq!(ui.count(|e| matches!(e, UiEvent::Score { .. })), 1);
}

#[test]
fn test_computer_game_terminates_cleanly() {
    let config = GameConfig::default()
        .with_players(4, PlayerKind::Computer)
        .with_turn_timeout(200)
        .with_warning(50)
        .with_freezes(5, 10)
        .with_key_interval(1)
        .with_seed(42);
    let ui = Arc::new(RecordingUi::new());
    let handle = Game::new(config, ui.clone()).unwrap().start().unwrap();

    std::thread::sleep(Duration::from_millis(600));
    handle.terminate();
    let table = Arc::clone(handle.table());
    let players = handle.players().to_vec();
    let outcome = handle.join().unwrap();

    assert!(table.is_consistent());
    assert_eq!(table.count_cards(), 0);
    assert!(players.iter().all(|p| p.is_terminated()));

    let max = outcome.scores.values().copied().max().unwrap_or(0);
    assert!(!outcome.winners.is_empty());
    for (player, &score) in outcome.scores.iter() {
        assert_eq!(outcome.is_winner(player), score == max);
    }
    let score_events = ui.count(|e| matches!(e, UiEvent::Score { .. }));
    assert_eq!(score_events as u32, outcome.total_points());
    assert!(ui.count(|e| matches!(e, UiEvent::Countdown { .. })) > 0);
}

#[test]
fn test_elapsed_timer_game_shows_elapsed_time() {
    let config = GameConfig::default()
        .with_players(1, PlayerKind::Human)
        .with_turn_timeout(0)
        .with_seed(9);
    let ui = Arc::new(RecordingUi::new());
    let handle = Game::new(config, ui.clone()).unwrap().start().unwrap();

    assert!(wait_until(Duration::from_secs(5), || handle.table().is_ready()));
    handle.terminate();
    handle.join().unwrap();

    assert!(ui.count(|e| matches!(e, UiEvent::Elapsed { .. })) > 0);
    assert_eq!(ui.count(|e| matches!(e, UiEvent::Countdown { .. })), 0);
}

#[test]
fn test_countdown_expiry_reshuffles() {
    let config = GameConfig::default()
        .with_players(1, PlayerKind::Human)
        .with_turn_timeout(60)
        .with_warning(20)
        .with_seed(11);
    let ui = Arc::new(RecordingUi::new());
    let handle = Game::new(config, ui.clone()).unwrap().start().unwrap();

    // Two full deals need at least one expiry in between.
    assert!(wait_until(Duration::from_secs(5), || {
        ui.count(|e| matches!(e, UiEvent::PlaceCard { .. })) >= 24
    }));
    handle.terminate();
    handle.join().unwrap();

    assert!(ui.count(|e| matches!(e, UiEvent::RemoveCard { .. })) >= 12);
    assert!(ui.count(|e| matches!(e, UiEvent::Countdown { warn: true, .. })) > 0);
}

/// Finds a set only in deck plus table, never among the 12 dealt cards.
struct DeadTableOracle;

impl SetOracle for DeadTableOracle {
    fn is_legal_set(&self, _cards: &[Card]) -> bool {
        false
    }

    fn find_sets(&self, cards: &[Card], _limit: usize) -> Vec<[Card; 3]> {
        if cards.len() > 12 {
            vec![[cards[0], cards[1], cards[2]]]
        } else {
            Vec::new()
        }
    }
}

#[test]
fn test_hidden_timer_never_reshuffles_dead_table() {
    let config = GameConfig::default()
        .with_players(1, PlayerKind::Human)
        .with_turn_timeout(-1)
        .with_seed(13);
    let ui = Arc::new(RecordingUi::new());
    let handle = Game::with_oracle(config, ui.clone(), Arc::new(DeadTableOracle))
        .unwrap()
        .start()
        .unwrap();

    assert!(wait_until(Duration::from_secs(5), || {
        handle.table().is_ready() && handle.table().count_cards() == 12
    }));
    // Several idle ticks with no set on the table.
    std::thread::sleep(Duration::from_millis(2500));

    assert_eq!(ui.count(|e| matches!(e, UiEvent::RemoveCard { .. })), 0);
    assert_eq!(ui.count(|e| matches!(e, UiEvent::PlaceCard { .. })), 12);
    assert!(!handle.is_finished());

    handle.terminate();
    handle.join().unwrap();
}
