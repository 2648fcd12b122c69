//! In-memory rendering surface.

use parking_lot::Mutex;

use super::UserInterface;
use crate::cards::{Card, Slot};
use crate::core::PlayerId;

/// One recorded UI call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    PlaceCard { card: Card, slot: Slot },
    RemoveCard { slot: Slot },
    PlaceToken { player: PlayerId, slot: Slot },
    RemoveToken { player: PlayerId, slot: Slot },
    Score { player: PlayerId, score: u32 },
    Freeze { player: PlayerId, millis: u64 },
    Countdown { millis: u64, warn: bool },
    Elapsed { millis: u64 },
    Winners(Vec<PlayerId>),
}

/// Records every call in order.
///
/// ```
/// use set_dealer::cards::Slot;
/// use set_dealer::ui::{RecordingUi, UiEvent, UserInterface};
///
/// let ui = RecordingUi::new();
/// ui.remove_card(Slot::new(3));
/// assert_eq!(ui.events(), vec![UiEvent::RemoveCard { slot: Slot::new(3) }]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&UiEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// The last announced winners, if the game has ended.
    #[must_use]
    pub fn winners(&self) -> Option<Vec<PlayerId>> {
        self.events.lock().iter().rev().find_map(|e| match e {
            UiEvent::Winners(w) => Some(w.clone()),
            _ => None,
        })
    }

    fn push(&self, event: UiEvent) {
        self.events.lock().push(event);
    }
}

impl UserInterface for RecordingUi {
    fn place_card(&self, card: Card, slot: Slot) {
        self.push(UiEvent::PlaceCard { card, slot });
    }

    fn remove_card(&self, slot: Slot) {
        self.push(UiEvent::RemoveCard { slot });
    }

    fn place_token(&self, player: PlayerId, slot: Slot) {
        self.push(UiEvent::PlaceToken { player, slot });
    }

    fn remove_token(&self, player: PlayerId, slot: Slot) {
        self.push(UiEvent::RemoveToken { player, slot });
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        self.push(UiEvent::Score { player, score });
    }

    fn set_freeze(&self, player: PlayerId, millis: u64) {
        self.push(UiEvent::Freeze { player, millis });
    }

    fn set_countdown(&self, millis: u64, warn: bool) {
        self.push(UiEvent::Countdown { millis, warn });
    }

    fn set_elapsed(&self, millis: u64) {
        self.push(UiEvent::Elapsed { millis });
    }

    fn announce_winners(&self, winners: &[PlayerId]) {
        self.push(UiEvent::Winners(winners.to_vec()));
    }
}
