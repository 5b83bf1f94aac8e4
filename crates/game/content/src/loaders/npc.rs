//! NPC merchant catalog loader.

use std::path::Path;

use game_core::NpcDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcCatalog {
    pub npcs: Vec<NpcDefinition>,
}

pub struct NpcLoader;

impl NpcLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<NpcDefinition>> {
        let catalog: NpcCatalog = read_ron(path, "npc catalog")?;
        Ok(catalog.npcs)
    }
}
