//! Item catalog loader.

use std::path::Path;

use game_core::ItemDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// Recipes that reference unknown ingredients are rejected so the
    /// planner never recurses into a missing item.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let catalog: ItemCatalog = read_ron(path, "item catalog")?;
        Self::validate(&catalog.items)?;
        Ok(catalog.items)
    }

    fn validate(items: &[ItemDefinition]) -> LoadResult<()> {
        for item in items {
            let Some(recipe) = &item.craft else {
                continue;
            };
            for ingredient in &recipe.items {
                if !items.iter().any(|known| known.code == ingredient.code) {
                    anyhow::bail!(
                        "Recipe of '{}' uses unknown item '{}'",
                        item.code,
                        ingredient.code
                    );
                }
            }
        }
        Ok(())
    }
}
