//! Map data loader.
//!
//! A map file lists the tiles of one layer that hold content. Empty tiles
//! are implicit: the navigator only ever targets tiles with content or
//! explicit coordinates.

use std::path::Path;

use game_core::{ContentKind, Layer, MapContent, MapTile, Position};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// Map data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    #[serde(default)]
    layer: Layer,
    tiles: Vec<(i32, i32, ContentKind, String)>, // (x, y, kind, code)
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load the content tiles of one layer.
    ///
    /// `first_id` numbers the tiles so ids stay unique across layers.
    pub fn load(path: &Path, first_id: u32) -> LoadResult<Vec<MapTile>> {
        let data: MapDataRon = read_ron(path, "map")?;
        Ok(Self::tiles(data, first_id))
    }

    fn tiles(data: MapDataRon, first_id: u32) -> Vec<MapTile> {
        data.tiles
            .into_iter()
            .zip(first_id..)
            .map(|((x, y, kind, code), map_id)| MapTile {
                map_id,
                position: Position::on_layer(x, y, data.layer),
                content: Some(MapContent { kind, code }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_inherit_the_layer() {
        let data: MapDataRon = ron::from_str(
            r#"(
                layer: underground,
                tiles: [(1, 2, monster, "cave_bat"), (0, 0, transition, "overworld")],
            )"#,
        )
        .expect("map parses");

        let tiles = MapLoader::tiles(data, 100);
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].map_id, 100);
        assert_eq!(tiles[1].map_id, 101);
        assert_eq!(tiles[0].position, Position::on_layer(1, 2, Layer::Underground));
        assert!(tiles[0].holds(ContentKind::Monster, "cave_bat"));
    }
}
