//! Engine error types.

use derive_more::{Display, Error};
use tracing::instrument;

use crate::GameState;

/// Opaque persistence failure with location tracking.
///
/// Connectivity problems, malformed rows and the like end up here. They are
/// fatal to the current request only.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}

/// Everything a game operation can fail with.
///
/// All variants except [`EngineError::Store`] are domain outcomes that leave
/// the game untouched; the caller decides how to report them.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum EngineError {
    /// Malformed move input: wrong colour count, unknown colour, bad tier...
    #[display("Invalid move: {}", _0)]
    Validation(String),

    /// No such game, or the user does not play in it.
    #[display("No such game")]
    NotFound,

    /// The user plays in the game but someone else is to act.
    #[display("Not your turn")]
    NotYourTurn,

    /// The game is not accepting this kind of move right now.
    #[display("Can't do that while the game is {}", _0)]
    WrongState(GameState),

    /// The addressed table slot holds no card.
    #[display("No card there")]
    NoCardThere,

    /// The player already holds the maximum number of reserved cards.
    #[display("Too many cards already reserved")]
    TooManyReserved,

    /// The bank or the player cannot cover the transfer.
    #[display("Not enough coins available to do that")]
    InsufficientCoins,

    /// Another move committed first; reload and resubmit.
    #[display("Game was updated concurrently")]
    Conflict,

    /// Persistence failure.
    #[display("{}", _0)]
    Store(StoreError),
}

impl EngineError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when resubmitting the same move against fresh state may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<diesel::result::Error> for EngineError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Store(StoreError::from(err))
    }
}

impl From<diesel::ConnectionError> for EngineError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::Store(StoreError::from(err))
    }
}
