//! # Command Errors
//!
//! Failure signals raised by the dispatcher and by command handlers.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Empty command line, or a first token with no registered handler.
    #[error("command not found: {0:?}")]
    NotFound(String),

    #[error("invalid arguments")]
    InvalidArguments,

    #[error("raffle not active")]
    RaffleNotActive,

    #[error("raffle already active")]
    RaffleAlreadyActive,

    #[error("sound not found")]
    SoundNotFound,

    #[error("{0}")]
    Failed(String),
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        CommandError::Failed(format!("{err:#}"))
    }
}
