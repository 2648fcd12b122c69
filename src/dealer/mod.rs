//! The dealer side of the game: the claim queue, the turn timer and the
//! dealer loop that ties them to the table.

pub mod claims;
pub mod runner;
pub mod timer;

pub use claims::ClaimQueue;
pub use runner::{Dealer, DealerHandle};
pub use timer::{TimerMode, TurnTimer, DISPLAY_TICK, IDLE_TICK, WARNING_TICK};
