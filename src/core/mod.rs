//! Core types: players, configuration, RNG.
//!
//! Everything the table, players and dealer share lives here. The runtime
//! validates a `GameConfig` once at startup and hands an `Arc` of it to
//! every component.

pub mod config;
pub mod player;
pub mod rng;

pub use config::{GameConfig, PlayerKind};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
