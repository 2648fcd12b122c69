//! The shared grid.
//!
//! ## Key Types
//!
//! - `Table`: slot/card maps, per-player tokens and the ready flag behind
//!   one lock
//! - `TableGuard`: exclusive access; the dealer's structural guard keeps the
//!   table not ready while it is held
//! - `Grid`: the raw state a guard exposes
//! - `Toggle`: outcome of a key press on the player's tokens

pub mod grid;
pub mod shared;

pub use grid::{Grid, TokenList};
pub use shared::{Table, TableGuard, Toggle};
