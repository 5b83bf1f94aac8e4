//! Closed error-kind taxonomy shared by the runtime and planners.
//!
//! Failures are carried as values. Every failure the bot can observe is
//! classified into one of a handful of coarse kinds so recovery policy can
//! be decided without inspecting messages:
//! - **NotFound**: unknown item/monster/resource, or nothing drops it
//! - **InsufficientSkill**: the character's level or skill gate is too low
//! - **AlreadyInProgress** / **OnCooldown**: recoverable by waiting
//! - **Generic**: anything else, usually an unexpected remote failure

/// Coarse classification of a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    NotFound,
    InsufficientSkill,
    AlreadyInProgress,
    OnCooldown,
    Generic,
}

impl ErrorKind {
    /// Returns a stable identifier for logs and metrics.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InsufficientSkill => "insufficient_skill",
            Self::AlreadyInProgress => "already_in_progress",
            Self::OnCooldown => "on_cooldown",
            Self::Generic => "generic",
        }
    }

    /// Returns true if waiting and retrying the same call may succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::AlreadyInProgress | Self::OnCooldown)
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
