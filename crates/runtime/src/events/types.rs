//! Event types for each topic.

use game_core::{ErrorKind, Position};
use serde::{Deserialize, Serialize};

use crate::jobs::JobId;

/// Lifecycle of jobs on a character's queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobEvent {
    Queued {
        character: String,
        job_id: JobId,
        job: String,
    },
    Started {
        character: String,
        job_id: JobId,
        job: String,
        idle: bool,
    },
    Completed {
        character: String,
        job_id: JobId,
        job: String,
    },
    /// The job yielded, usually after splicing prerequisites in front of it.
    Suspended {
        character: String,
        job_id: JobId,
        job: String,
    },
    Failed {
        character: String,
        job_id: JobId,
        job: String,
        kind: ErrorKind,
        message: String,
    },
    /// Queued jobs discarded by clearing, deletion or failure recovery.
    Purged {
        character: String,
        job_ids: Vec<JobId>,
    },
}

impl JobEvent {
    pub fn character(&self) -> &str {
        match self {
            Self::Queued { character, .. }
            | Self::Started { character, .. }
            | Self::Completed { character, .. }
            | Self::Suspended { character, .. }
            | Self::Failed { character, .. }
            | Self::Purged { character, .. } => character,
        }
    }
}

/// Changes to a character's snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterEvent {
    /// The snapshot was reloaded from the remote source of truth.
    Resynced { character: String },
    /// A remote action returned a fresh snapshot.
    Updated {
        character: String,
        action: String,
        position: Position,
        hp: i32,
    },
}
