//! Read-only world data.
//!
//! [`GameData`] is the static snapshot of the game catalog (items, monsters,
//! resources, map tiles, NPCs). It is populated once at startup and shared
//! behind an `Arc` afterwards, so lookups need no synchronization.
mod events;

use std::collections::HashMap;

pub use events::ActiveEvent;

use crate::state::{
    ContentKind, ItemDefinition, MapTile, MonsterDefinition, NpcDefinition, Position, Recipe,
    ResourceDefinition, Skill,
};

#[derive(Clone, Debug, Default)]
pub struct GameData {
    items: HashMap<String, ItemDefinition>,
    monsters: HashMap<String, MonsterDefinition>,
    resources: HashMap<String, ResourceDefinition>,
    npcs: HashMap<String, NpcDefinition>,
    maps: Vec<MapTile>,
}

impl GameData {
    pub fn new(
        items: Vec<ItemDefinition>,
        monsters: Vec<MonsterDefinition>,
        resources: Vec<ResourceDefinition>,
        maps: Vec<MapTile>,
        npcs: Vec<NpcDefinition>,
    ) -> Self {
        Self {
            items: items.into_iter().map(|i| (i.code.clone(), i)).collect(),
            monsters: monsters.into_iter().map(|m| (m.code.clone(), m)).collect(),
            resources: resources.into_iter().map(|r| (r.code.clone(), r)).collect(),
            npcs: npcs.into_iter().map(|n| (n.code.clone(), n)).collect(),
            maps,
        }
    }

    pub fn item(&self, code: &str) -> Option<&ItemDefinition> {
        self.items.get(code)
    }

    pub fn monster(&self, code: &str) -> Option<&MonsterDefinition> {
        self.monsters.get(code)
    }

    pub fn resource(&self, code: &str) -> Option<&ResourceDefinition> {
        self.resources.get(code)
    }

    pub fn npc(&self, code: &str) -> Option<&NpcDefinition> {
        self.npcs.get(code)
    }

    pub fn recipe(&self, code: &str) -> Option<&Recipe> {
        self.items.get(code).and_then(|item| item.craft.as_ref())
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    pub fn monsters(&self) -> impl Iterator<Item = &MonsterDefinition> {
        self.monsters.values()
    }

    pub fn resources(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.resources.values()
    }

    pub fn tiles(&self) -> &[MapTile] {
        &self.maps
    }

    /// Resources yielding `code`, lowest level first.
    pub fn resources_dropping(&self, code: &str) -> Vec<&ResourceDefinition> {
        let mut found: Vec<_> = self
            .resources
            .values()
            .filter(|resource| resource.drop_of(code).is_some())
            .collect();
        found.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.code.cmp(&b.code)));
        found
    }

    /// Monsters dropping `code`, lowest level first.
    pub fn monsters_dropping(&self, code: &str) -> Vec<&MonsterDefinition> {
        let mut found: Vec<_> = self
            .monsters
            .values()
            .filter(|monster| monster.drop_of(code).is_some())
            .collect();
        found.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.code.cmp(&b.code)));
        found
    }

    /// NPCs selling `code`, cheapest first.
    pub fn npcs_selling(&self, code: &str) -> Vec<(&NpcDefinition, u32)> {
        let mut found: Vec<_> = self
            .npcs
            .values()
            .filter_map(|npc| npc.buy_price(code).map(|price| (npc, price)))
            .collect();
        found.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.code.cmp(&b.0.code)));
        found
    }

    /// Items crafted with `skill`, lowest level first.
    pub fn craftable_with(&self, skill: Skill) -> Vec<&ItemDefinition> {
        let mut found: Vec<_> = self
            .items
            .values()
            .filter(|item| item.craft.as_ref().is_some_and(|r| r.skill == skill))
            .collect();
        found.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.code.cmp(&b.code)));
        found
    }

    pub fn tiles_with<'a>(
        &'a self,
        kind: ContentKind,
        code: &'a str,
    ) -> impl Iterator<Item = &'a MapTile> + 'a {
        self.maps.iter().filter(move |tile| tile.holds(kind, code))
    }

    /// Closest tile holding the content, preferring tiles on the same layer.
    pub fn nearest_tile<'a>(&'a self, from: &Position, kind: ContentKind, code: &'a str) -> Option<&'a MapTile> {
        self.tiles_with(kind, code).min_by_key(|tile| {
            (
                tile.position.layer != from.layer,
                tile.position.distance(from),
            )
        })
    }

    /// Closest tile holding any content of `kind`.
    pub fn nearest_of_kind(&self, from: &Position, kind: ContentKind) -> Option<&MapTile> {
        self.maps
            .iter()
            .filter(|tile| tile.holds_kind(kind))
            .min_by_key(|tile| {
                (
                    tile.position.layer != from.layer,
                    tile.position.distance(from),
                )
            })
    }
}
