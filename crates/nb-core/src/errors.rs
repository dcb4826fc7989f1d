/// Core error type for the notes bot.
///
/// `InvalidPosition` and `EmptyQuery` are user mistakes and are turned into
/// guidance replies by the router. Everything else is a real failure and is
/// handed back to the adapter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid note position: {0}")]
    InvalidPosition(#[from] InvalidPosition),

    #[error("search query is empty")]
    EmptyQuery,

    #[error("external error: {0}")]
    External(String),
}

/// Why a `/delete` argument could not be resolved to a note.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPosition {
    #[error("position is missing")]
    Missing,

    #[error("{0:?} is not a number")]
    NotANumber(String),

    #[error("position {position} is outside 1..={count}")]
    OutOfRange { position: i64, count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
