//! Top-level strategy: what an idle character should do next.
//!
//! The policy worker asks a [`DecisionPolicy`] about every character whose
//! queue ran dry and queues whatever it proposes. Policies only read; all
//! state changes go through the actor's enqueue operations.
mod default;

use chrono::{DateTime, Utc};
use game_core::{Character, EquipmentOptimizer};

pub use default::DefaultPolicy;

use crate::actor::WishList;
use crate::config::{CharacterConfig, RuntimeConfig};
use crate::jobs::JobKind;
use crate::oracle::WorldState;

/// Everything a policy may look at for one character.
pub struct PolicyView<'a> {
    pub character: &'a Character,
    pub settings: Option<&'a CharacterConfig>,
    pub wishes: &'a WishList,
    pub world: &'a WorldState,
    pub optimizer: &'a EquipmentOptimizer,
    pub config: &'a RuntimeConfig,
    pub now: DateTime<Utc>,
}

/// Jobs to queue, with the reason they were chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub reason: &'static str,
    pub jobs: Vec<JobKind>,
}

impl Decision {
    pub fn new(reason: &'static str, jobs: Vec<JobKind>) -> Self {
        Self { reason, jobs }
    }
}

pub trait DecisionPolicy: Send + Sync {
    /// `None` leaves the character to its idle jobs.
    fn decide(&self, view: &PolicyView<'_>) -> Option<Decision>;
}
