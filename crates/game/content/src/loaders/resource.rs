//! Resource catalog loader.

use std::path::Path;

use game_core::ResourceDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceCatalog {
    pub resources: Vec<ResourceDefinition>,
}

pub struct ResourceLoader;

impl ResourceLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ResourceDefinition>> {
        let catalog: ResourceCatalog = read_ron(path, "resource catalog")?;
        for resource in &catalog.resources {
            if !resource.skill.is_gathering() {
                anyhow::bail!(
                    "Resource '{}' is gathered with non-gathering skill {}",
                    resource.code,
                    resource.skill
                );
            }
        }
        Ok(catalog.resources)
    }
}
