use game_core::ErrorKind;
use thiserror::Error;

use crate::remote::{ClientError, NavigationError};

pub type JobResult<T> = Result<T, JobError>;

/// Why a job stopped without reaching its goal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("{kind}: {message}")]
    Failed { kind: ErrorKind, message: String },

    /// The interrupt token fired at a safe point.
    #[error("interrupted")]
    Interrupted,
}

impl JobError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn insufficient_skill(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientSkill, message)
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generic, message)
    }

    /// Coarse kind; an interruption reports as generic.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Failed { kind, .. } => *kind,
            Self::Interrupted => ErrorKind::Generic,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

impl From<ClientError> for JobError {
    fn from(error: ClientError) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}

impl From<NavigationError> for JobError {
    fn from(error: NavigationError) -> Self {
        match error {
            NavigationError::Action(inner) => inner,
            other => Self::not_found(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let error = JobError::from(ClientError::AtCapacity("inventory full".into()));
        assert_eq!(error.kind(), ErrorKind::Generic);
        assert!(error.to_string().contains("inventory full"));
    }

    #[test]
    fn client_skill_errors_stay_classified() {
        let error = JobError::from(ClientError::InsufficientSkill("mining 10".into()));
        assert_eq!(error.kind(), ErrorKind::InsufficientSkill);
    }

    #[test]
    fn interruptions_survive_navigation() {
        let error = JobError::from(NavigationError::Action(JobError::Interrupted));
        assert!(error.is_interrupted());
    }
}
