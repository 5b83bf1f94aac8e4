//! Client configuration: where the world lives, where logs go, and how the
//! offline server is seeded.
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use game_core::ItemStack;
use runtime::RuntimeConfig;
use serde::Deserialize;

const DEFAULT_DATA_DIR: &str = "data";
const CONFIG_FILE: &str = "bot.toml";

/// Process-level settings, read from the environment.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    /// Explicit config file; defaults to `bot.toml` in the data directory.
    pub config_file: Option<PathBuf>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    /// Stop after this long instead of waiting for ctrl-c.
    pub run_for: Option<Duration>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BOT_DATA_DIR` - World data directory (default: `data`)
    /// - `BOT_CONFIG` - Configuration file (default: `<data dir>/bot.toml`)
    /// - `BOT_SESSION_ID` - Session identifier for the log directory
    /// - `BOT_LOG_DIR` - Log root (default: platform cache directory)
    /// - `BOT_SEED` - Seed for idle-job draws
    /// - `BOT_RUN_SECS` - Stop after this many seconds
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_dir: lookup("BOT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            config_file: lookup("BOT_CONFIG").map(PathBuf::from),
            session_id: lookup("BOT_SESSION_ID"),
            log_dir: lookup("BOT_LOG_DIR").map(PathBuf::from),
            seed: lookup("BOT_SEED").and_then(|v| v.parse().ok()),
            run_for: lookup("BOT_RUN_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(CONFIG_FILE))
    }

    /// Platform log root when `BOT_LOG_DIR` is unset.
    pub fn log_root(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("", "", "artifacts-bot")
                .map(|dirs| dirs.cache_dir().to_path_buf())
                .unwrap_or_else(|| env::temp_dir().join("artifacts-bot"))
                .join("logs")
        })
    }
}

/// `[offline]` table of `bot.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OfflineSettings {
    pub cooldown_ms: u64,
    /// Successful actions per skill level; zero disables leveling.
    pub actions_per_level: u32,
    pub start_level: u32,
    pub start_position: (i32, i32),
    pub bank_gold: u32,
    pub bank_items: Vec<ItemStack>,
    /// Handed to every character at startup.
    pub starter_items: Vec<ItemStack>,
}

impl Default for OfflineSettings {
    fn default() -> Self {
        Self {
            cooldown_ms: 0,
            actions_per_level: 0,
            start_level: 1,
            start_position: (4, 1),
            bank_gold: 0,
            bank_items: Vec::new(),
            starter_items: Vec::new(),
        }
    }
}

impl OfflineSettings {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OfflineSection {
    offline: OfflineSettings,
}

/// Both halves of `bot.toml`.
#[derive(Clone, Debug)]
pub struct BotFile {
    pub runtime: RuntimeConfig,
    pub offline: OfflineSettings,
}

impl BotFile {
    /// Load `path` and apply `BOT_*` overrides to the runtime half.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut runtime = RuntimeConfig::from_file(path)?;
        runtime.apply_env();
        let section: OfflineSection = game_content::ConfigLoader::load(path)?;
        Ok(Self {
            runtime,
            offline: section.offline,
        })
    }
}
