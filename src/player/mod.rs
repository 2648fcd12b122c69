//! Player agents.
//!
//! Each player runs a control thread that turns key presses into token
//! moves and claims. Computer players add a second thread that presses
//! random keys; human players get their presses from `Player::key_pressed`.

pub mod agent;
pub mod computer;

pub use agent::{Player, PlayerState, Verdict, FREEZE_TICK};
