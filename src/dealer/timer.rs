//! The turn timer and its display cadence.

use std::time::{Duration, Instant};

use crate::core::GameConfig;
use crate::ui::UserInterface;

/// Display refresh while the countdown is above the warning threshold.
pub const DISPLAY_TICK: Duration = Duration::from_millis(900);

/// Display refresh during the warning phase.
pub const WARNING_TICK: Duration = Duration::from_millis(10);

/// Longest the dealer sleeps when no timer is shown.
pub const IDLE_TICK: Duration = Duration::from_millis(1_000);

/// How the turn timer behaves, from `turn_timeout_millis`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerMode {
    /// Negative timeout: nothing shown, never expires.
    Hidden,
    /// Zero timeout: show time since the last reset, never expires.
    Elapsed,
    /// Positive timeout: count down and force a reshuffle at zero.
    Countdown { timeout: Duration, warning: Duration },
}

impl TimerMode {
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        match config.turn_timeout_millis {
            t if t < 0 => TimerMode::Hidden,
            0 => TimerMode::Elapsed,
            t => TimerMode::Countdown {
                timeout: Duration::from_millis(t as u64),
                warning: Duration::from_millis(config.turn_timeout_warning_millis),
            },
        }
    }
}

/// Deadline bookkeeping for the current turn.
#[derive(Clone, Debug)]
pub struct TurnTimer {
    mode: TimerMode,
    last_reset: Instant,
    reshuffle_at: Option<Instant>,
}

impl TurnTimer {
    #[must_use]
    pub fn new(mode: TimerMode, now: Instant) -> Self {
        let mut timer = Self {
            mode,
            last_reset: now,
            reshuffle_at: None,
        };
        timer.reset(now);
        timer
    }

    #[must_use]
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Start a new turn at `now`.
    pub fn reset(&mut self, now: Instant) {
        self.last_reset = now;
        self.reshuffle_at = match self.mode {
            TimerMode::Countdown { timeout, .. } => Some(now + timeout),
            TimerMode::Hidden | TimerMode::Elapsed => None,
        };
    }

    #[must_use]
    pub fn last_reset(&self) -> Instant {
        self.last_reset
    }

    #[must_use]
    pub fn reshuffle_at(&self) -> Option<Instant> {
        self.reshuffle_at
    }

    /// Whether expiry forces a reshuffle in this mode.
    #[must_use]
    pub fn forces_reshuffle(&self) -> bool {
        matches!(self.mode, TimerMode::Countdown { .. })
    }

    /// True once `now` reaches the reshuffle deadline.
    #[must_use]
    pub fn expired(&self, now: Instant) -> bool {
        self.reshuffle_at.is_some_and(|at| now >= at)
    }

    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.reshuffle_at.map(|at| at.saturating_duration_since(now))
    }

    /// How long the dealer may sleep before the display needs a refresh or
    /// the deadline arrives.
    #[must_use]
    pub fn next_wait(&self, now: Instant) -> Duration {
        match self.mode {
            TimerMode::Hidden => IDLE_TICK,
            TimerMode::Elapsed => DISPLAY_TICK,
            TimerMode::Countdown { warning, .. } => {
                let remaining = self.remaining(now).unwrap_or_default();
                let tick = if remaining > warning { DISPLAY_TICK } else { WARNING_TICK };
                remaining.min(tick)
            }
        }
    }

    /// Push the current reading to the UI.
    pub fn display(&self, now: Instant, ui: &dyn UserInterface) {
        match self.mode {
            TimerMode::Hidden => {}
            TimerMode::Elapsed => {
                let elapsed = now.saturating_duration_since(self.last_reset);
                ui.set_elapsed(elapsed.as_millis() as u64);
            }
            TimerMode::Countdown { warning, .. } => {
                let remaining = self.remaining(now).unwrap_or_default();
                ui.set_countdown(remaining.as_millis() as u64, remaining < warning);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{RecordingUi, UiEvent};

    fn countdown(timeout_ms: u64, warning_ms: u64) -> TimerMode {
        TimerMode::Countdown {
            timeout: Duration::from_millis(timeout_ms),
            warning: Duration::from_millis(warning_ms),
        }
    }

    #[test]
    fn test_mode_from_config() {
        let config = GameConfig::default();
        assert_eq!(TimerMode::from_config(&config.clone().with_turn_timeout(-5)), TimerMode::Hidden);
        assert_eq!(TimerMode::from_config(&config.clone().with_turn_timeout(0)), TimerMode::Elapsed);
        assert_eq!(
            TimerMode::from_config(&config.with_turn_timeout(2_000).with_warning(500)),
            countdown(2_000, 500)
        );
    }

    #[test]
    fn test_countdown_expires_exactly_at_deadline() {
        let start = Instant::now();
        let timer = TurnTimer::new(countdown(1_000, 100), start);

        assert!(timer.forces_reshuffle());
        assert!(!timer.expired(start + Duration::from_millis(999)));
        assert!(timer.expired(start + Duration::from_millis(1_000)));
    }

    #[test]
    fn test_hidden_and_elapsed_never_expire() {
        let start = Instant::now();
        let far = start + Duration::from_secs(3_600);
        for mode in [TimerMode::Hidden, TimerMode::Elapsed] {
            let timer = TurnTimer::new(mode, start);
            assert!(!timer.forces_reshuffle());
            assert!(!timer.expired(far));
            assert_eq!(timer.reshuffle_at(), None);
        }
    }

    #[test]
    fn test_reset_moves_deadline_and_last_reset() {
        let start = Instant::now();
        let mut timer = TurnTimer::new(countdown(1_000, 100), start);
        let later = start + Duration::from_millis(700);
        timer.reset(later);

        assert_eq!(timer.last_reset(), later);
        assert_eq!(timer.reshuffle_at(), Some(later + Duration::from_millis(1_000)));
    }

    #[test]
    fn test_next_wait_switches_to_warning_tick() {
        let start = Instant::now();
        let timer = TurnTimer::new(countdown(10_000, 1_000), start);

        assert_eq!(timer.next_wait(start), DISPLAY_TICK);
        assert_eq!(timer.next_wait(start + Duration::from_millis(9_500)), WARNING_TICK);
        assert_eq!(timer.next_wait(start + Duration::from_millis(9_995)), Duration::from_millis(5));
        assert_eq!(timer.next_wait(start + Duration::from_secs(20)), Duration::ZERO);
    }

    #[test]
    fn test_display_per_mode() {
        let start = Instant::now();
        let ui = RecordingUi::new();

        TurnTimer::new(TimerMode::Hidden, start).display(start, &ui);
        assert!(ui.events().is_empty());

        TurnTimer::new(TimerMode::Elapsed, start).display(start + Duration::from_millis(250), &ui);
        assert_eq!(ui.events(), vec![UiEvent::Elapsed { millis: 250 }]);

        ui.clear();
        let timer = TurnTimer::new(countdown(1_000, 300), start);
        timer.display(start + Duration::from_millis(500), &ui);
        timer.display(start + Duration::from_millis(800), &ui);
        assert_eq!(
            ui.events(),
            vec![
                UiEvent::Countdown { millis: 500, warn: false },
                UiEvent::Countdown { millis: 200, warn: true },
            ]
        );
    }
}
