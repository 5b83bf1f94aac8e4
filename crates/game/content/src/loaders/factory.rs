//! Content factory for building the world snapshot from data files.

use std::path::{Path, PathBuf};

use game_core::{GameData, ItemDefinition, MapTile, MonsterDefinition, NpcDefinition, ResourceDefinition};
use serde::de::DeserializeOwned;

use crate::loaders::{
    ConfigLoader, ItemLoader, LoadResult, MapLoader, MonsterLoader, NpcLoader, ResourceLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── bot.toml
/// ├── items.ron
/// ├── monsters.ron
/// ├── resources.ron
/// ├── npcs.ron
/// └── maps/
///     ├── overworld.ron
///     └── underground.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load configuration from `name` inside the data directory.
    pub fn load_config<T: DeserializeOwned>(&self, name: &str) -> LoadResult<T> {
        ConfigLoader::load(&self.data_dir.join(name))
    }

    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    pub fn load_monsters(&self) -> LoadResult<Vec<MonsterDefinition>> {
        MonsterLoader::load(&self.data_dir.join("monsters.ron"))
    }

    pub fn load_resources(&self) -> LoadResult<Vec<ResourceDefinition>> {
        ResourceLoader::load(&self.data_dir.join("resources.ron"))
    }

    /// Load merchants from `npcs.ron`; a missing file means no merchants.
    pub fn load_npcs(&self) -> LoadResult<Vec<NpcDefinition>> {
        let path = self.data_dir.join("npcs.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        NpcLoader::load(&path)
    }

    /// Load every `maps/*.ron` file, in file-name order.
    pub fn load_maps(&self) -> LoadResult<Vec<MapTile>> {
        let maps_dir = self.data_dir.join("maps");
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&maps_dir)
            .map_err(|e| anyhow::anyhow!("Failed to list maps in {}: {}", maps_dir.display(), e))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
            .collect();
        paths.sort();

        let mut tiles = Vec::new();
        for path in paths {
            let first_id = tiles.len() as u32;
            tiles.extend(MapLoader::load(&path, first_id)?);
        }
        Ok(tiles)
    }

    /// Load the whole static world.
    pub fn load_world(&self) -> LoadResult<GameData> {
        Ok(GameData::new(
            self.load_items()?,
            self.load_monsters()?,
            self.load_resources()?,
            self.load_maps()?,
            self.load_npcs()?,
        ))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_the_bundled_sample_world() {
        let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../data");
        let world = ContentFactory::new(data_dir)
            .load_world()
            .expect("sample world loads");

        assert!(world.item("iron_bar").is_some());
        assert!(world.monster("chicken").is_some());
        assert!(!world.resources_dropping("iron_ore").is_empty());
        assert!(!world.tiles().is_empty());
    }
}
