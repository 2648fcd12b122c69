//! Game assembly and lifecycle.

pub mod outcome;
pub mod runtime;

pub use outcome::GameOutcome;
pub use runtime::{Game, GameHandle};
