//! Errors surfaced by the runtime.
//!
//! Dealer and player threads never return errors: faults during play become
//! verdicts or logged no-ops. Only startup and teardown can fail.

use thiserror::Error;

/// Invalid or unreadable configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("set size {0} is not supported, the legality rule needs exactly 3 cards")]
    UnsupportedSetSize(usize),
    #[error("{0} values per feature is not supported, the legality rule needs exactly 3")]
    UnsupportedFeatureValues(usize),
    #[error("cards need at least one feature")]
    NoFeatures,
    #[error("deck must contain at least one card")]
    EmptyDeck,
    #[error("deck size {deck_size} exceeds the {max} distinct card codes available")]
    DeckTooLarge { deck_size: usize, max: usize },
    #[error("table of {table_size} slots cannot hold a set of {set_size}")]
    TableTooSmall { table_size: usize, set_size: usize },
    #[error("table of {table_size} slots exceeds the {max} addressable slots")]
    TableTooLarge { table_size: usize, max: usize },
    #[error("player count {0} is outside 1..=255")]
    PlayerCount(usize),
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of the game runtime as a whole.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("spawning thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("thread {thread} panicked")]
    ThreadPanicked { thread: String },
}
