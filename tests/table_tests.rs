//! Table invariants under concurrent access.

use std::sync::Arc;
use std::thread;

use set_dealer::{Card, GameConfig, PlayerId, PlayerKind, RecordingUi, Slot, Table, Toggle, UiEvent};

fn table(players: usize) -> (Arc<Table>, Arc<RecordingUi>) {
    let config = GameConfig::default().with_players(players, PlayerKind::Human);
    let ui = Arc::new(RecordingUi::new());
    (Arc::new(Table::new(&config, ui.clone())), ui)
}

#[test]
fn test_concurrent_toggles_keep_invariants() {
    let (table, _) = table(4);
    for card in 0..12 {
        table.place_card(Card(card * 3), Slot(card as u16));
    }

    let workers: Vec<_> = PlayerId::all(4)
        .map(|player| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for i in 0..2_000u32 {
                    let slot = Slot(((i * 7 + player.0 as u32 * 5) % 12) as u16);
                    table.toggle_token(player, slot);
                }
            })
        })
        .collect();

    // Concurrent structural churn on one slot.
    for _ in 0..200 {
        if let Some(card) = table.remove_card(Slot(11)) {
            assert!(table.place_card(card, Slot(11)));
        }
    }
    for worker in workers {
        worker.join().unwrap();
    }

    assert!(table.is_consistent());
    for player in PlayerId::all(4) {
        assert!(table.tokens(player).len() <= 3);
    }
}

#[test]
fn test_ui_sees_matched_token_events() {
    let (table, ui) = table(2);
    for card in 0..3 {
        table.place_card(Card(card), Slot(card as u16));
    }
    let p = PlayerId::new(1);
    assert_eq!(table.toggle_token(p, Slot(1)), Toggle::Placed { tokens: 1 });
    assert_eq!(table.toggle_token(p, Slot(1)), Toggle::Removed { tokens: 0 });
    table.place_token(p, Slot(2));
    table.remove_card(Slot(2));

    let placed = ui.count(|e| matches!(e, UiEvent::PlaceToken { .. }));
    let removed = ui.count(|e| matches!(e, UiEvent::RemoveToken { .. }));
    assert_eq!(placed, 2);
    assert_eq!(removed, 2);
}

#[test]
fn test_structural_guard_blocks_readiness_across_threads() {
    let (table, _) = table(1);
    table.set_ready(true);

    let guard = table.structural();
    let observer = {
        let table = Arc::clone(&table);
        thread::spawn(move || table.is_ready())
    };
    assert!(!observer.join().unwrap());
    drop(guard);
    assert!(table.is_ready());
}

#[test]
fn test_guard_replaces_card_atomically() {
    let (table, _) = table(2);
    table.place_card(Card(4), Slot(0));
    table.place_token(PlayerId::new(0), Slot(0));
    {
        let mut guard = table.structural();
        assert_eq!(guard.remove_card(Slot(0)), Some(Card(4)));
        assert!(guard.place_card(Card(5), Slot(0)));
        assert!(guard.tokens(PlayerId::new(0)).is_empty());
    }
    assert_eq!(table.card_at(Slot(0)), Some(Card(5)));
    assert_eq!(table.cards(), vec![Card(5)]);
    assert!(table.is_consistent());
}
