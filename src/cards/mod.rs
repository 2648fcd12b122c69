//! Cards, slots and set legality.
//!
//! ## Key Types
//!
//! - `Card`: opaque card code; features decode as base-3 digits
//! - `Slot`: grid position
//! - `SetOracle`: legality and search, consulted by the dealer
//! - `FeatureOracle`: the standard all-same-or-all-different rule

pub mod card;
pub mod oracle;

pub use card::{Card, Slot};
pub use oracle::{FeatureOracle, SetOracle};
