//! Runtime configuration.
//!
//! Loaded from `bot.toml` and then overridden from the environment. Every
//! field has a default so an empty file is a valid configuration.

use std::path::Path;
use std::time::Duration;

use game_core::{CombatTuning, Inventory, Skill, TaskKind};
use serde::{Deserialize, Serialize};

use crate::jobs::JobKind;
use crate::jobs::kinds::{Fight, Gather, TrainSkill};

/// Default idle work a character falls back to when its queue is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdleJobSpec {
    Gather {
        resource: String,
        item: String,
        amount: u32,
    },
    Fight {
        monster: String,
        times: u32,
    },
    Train {
        skill: Skill,
        level: u32,
    },
}

impl IdleJobSpec {
    pub fn to_job_kind(&self) -> JobKind {
        match self {
            Self::Gather {
                resource,
                item,
                amount,
            } => JobKind::Gather(Gather::new(resource, item, *amount)),
            Self::Fight { monster, times } => JobKind::Fight(Fight::times(monster, *times)),
            Self::Train { skill, level } => JobKind::TrainSkill(TrainSkill::new(*skill, *level)),
        }
    }
}

/// A skill level the decision policy trains toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGoal {
    pub skill: Skill,
    pub level: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub name: String,
    pub idle_jobs: Vec<IdleJobSpec>,
    /// Skills to train, in priority order.
    pub train: Vec<SkillGoal>,
    /// Kind of task to take from the tasks master, if any.
    pub tasks: Option<TaskKind>,
}

impl CharacterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Runtime configuration shared across actors, the policy and workers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Sleep between scheduler ticks when a character has nothing to do.
    pub idle_poll_ms: u64,
    /// Interval between decision policy runs.
    pub policy_interval_ms: u64,
    pub enable_policy: bool,
    /// Age after which a bank reservation expires.
    pub reservation_ttl_secs: u64,
    pub reservation_cleanup_secs: u64,
    /// Age after which a wish-list entry is dropped.
    pub wish_max_age_secs: u64,
    /// Resumptions a planning job may take before it is failed.
    pub max_resumptions: u32,
    /// Retries of a remote call rejected as on-cooldown or already-in-progress.
    pub max_remote_retries: u32,
    /// Inventory fill ratio (percent) that triggers the deposit chore.
    pub nearly_full_percent: u32,
    pub event_buffer_size: usize,
    pub combat: CombatTuning,
    pub characters: Vec<CharacterConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            idle_poll_ms: 500,
            policy_interval_ms: 2_000,
            enable_policy: true,
            reservation_ttl_secs: 300,
            reservation_cleanup_secs: 30,
            wish_max_age_secs: 1_800,
            max_resumptions: 25,
            max_remote_retries: 3,
            nearly_full_percent: 90,
            event_buffer_size: 256,
            combat: CombatTuning::default(),
            characters: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> game_content::LoadResult<Self> {
        game_content::ConfigLoader::load(path)
    }

    /// Apply `BOT_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparseable values are ignored
    /// with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parse<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
            let value = value?;
            match value.parse() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    tracing::warn!(key, value = %value, "ignoring unparseable override");
                    None
                }
            }
        }

        if let Some(v) = parse("BOT_IDLE_POLL_MS", lookup("BOT_IDLE_POLL_MS")) {
            self.idle_poll_ms = v;
        }
        if let Some(v) = parse("BOT_POLICY_INTERVAL_MS", lookup("BOT_POLICY_INTERVAL_MS")) {
            self.policy_interval_ms = v;
        }
        if let Some(v) = parse("BOT_RESERVATION_TTL_SECS", lookup("BOT_RESERVATION_TTL_SECS")) {
            self.reservation_ttl_secs = v;
        }
        if let Some(v) = parse("BOT_MAX_RESUMPTIONS", lookup("BOT_MAX_RESUMPTIONS")) {
            self.max_resumptions = v;
        }
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }

    pub fn policy_interval(&self) -> Duration {
        Duration::from_millis(self.policy_interval_ms.max(1))
    }

    pub fn reservation_ttl(&self) -> Duration {
        Duration::from_secs(self.reservation_ttl_secs)
    }

    pub fn reservation_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.reservation_cleanup_secs.max(1))
    }

    pub fn wish_max_age(&self) -> Duration {
        Duration::from_secs(self.wish_max_age_secs)
    }

    /// Whether the inventory reached the deposit threshold.
    pub fn is_nearly_full(&self, inventory: &Inventory) -> bool {
        if inventory.is_full() || inventory.max_items == 0 {
            return true;
        }
        inventory.total_items() * 100 >= inventory.max_items * self.nearly_full_percent
    }

    pub fn character(&self, name: &str) -> Option<&CharacterConfig> {
        self.characters.iter().find(|c| c.name == name)
    }
}
