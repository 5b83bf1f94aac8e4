//! Configuration loader.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::loaders::{LoadResult, read_file};

/// Loader for configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load any deserialisable configuration from a TOML file.
    pub fn load<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse<T: DeserializeOwned>(content: &str) -> LoadResult<T> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::CombatTuning;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let tuning: CombatTuning = ConfigLoader::parse("agreement_percent = 75\n").expect("parses");
        assert_eq!(tuning.agreement_percent, 75);
        assert_eq!(tuning.crit_offsets, vec![0, 25, 50, 75]);
        assert_eq!(tuning.required_agreement(), 3);
    }
}
