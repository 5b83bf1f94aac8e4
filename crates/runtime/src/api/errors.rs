//! Errors surfaced while assembling or stopping the runtime.
//!
//! Job failures never reach this type: the scheduler turns them into
//! `JobEvent::Failed` and recovers on its own.
use thiserror::Error;

use crate::remote::ClientError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires world data before building")]
    MissingWorld,

    #[error("runtime requires a game client before building")]
    MissingClient,

    #[error("no characters configured")]
    NoCharacters,

    #[error("character {0} configured twice")]
    DuplicateCharacter(String),

    #[error("failed to load character {character}")]
    Character {
        character: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to load bank contents")]
    Bank(#[source] ClientError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
