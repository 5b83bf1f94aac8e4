use chrono::{DateTime, Utc};

use crate::state::{MapContent, Position};

/// A temporary world event: a monster or resource spawned somewhere until
/// `expiration`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEvent {
    pub code: String,
    pub content: MapContent,
    pub position: Position,
    pub expiration: DateTime<Utc>,
}

impl ActiveEvent {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expiration > now
    }
}
