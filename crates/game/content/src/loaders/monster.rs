//! Monster catalog loader.

use std::path::Path;

use game_core::MonsterDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterCatalog {
    pub monsters: Vec<MonsterDefinition>,
}

pub struct MonsterLoader;

impl MonsterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<MonsterDefinition>> {
        let catalog: MonsterCatalog = read_ron(path, "monster catalog")?;
        for monster in &catalog.monsters {
            if monster.hp <= 0 {
                anyhow::bail!("Monster '{}' has no hit points", monster.code);
            }
        }
        Ok(catalog.monsters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_elemental_blocks_with_defaults() {
        let catalog: MonsterCatalog = ron::from_str(
            r#"(
                monsters: [
                    (
                        code: "chicken",
                        level: 1,
                        hp: 60,
                        attack: (water: 4),
                        resistance: (earth: 25),
                        drops: [(code: "feather", rate: 8, min_quantity: 1, max_quantity: 1)],
                    ),
                ],
            )"#,
        )
        .expect("catalog parses");

        let chicken = &catalog.monsters[0];
        assert_eq!(chicken.attack.water, 4);
        assert_eq!(chicken.attack.fire, 0);
        assert_eq!(chicken.resistance.earth, 25);
        assert_eq!(chicken.critical_strike, 0);
        assert!(chicken.drop_of("feather").is_some());
    }
}
