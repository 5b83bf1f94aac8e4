//! Records describing the game as the bot observes it.
//!
//! Static catalog records (items, monsters, resources, map tiles, NPCs) are
//! loaded once and never mutated. The [`Character`] snapshot is replaced
//! wholesale every time the remote server answers an action.
pub mod types;

pub use types::{
    Character, ContentKind, Drop, Effect, EffectKind, Element, ElementalStats, EquippedItem,
    Equipment, Inventory, InventorySlot, ItemDefinition, ItemKind, ItemStack, Layer, MapContent,
    MapTile, MonsterDefinition, NpcDefinition, NpcOffer, Position, Recipe, ResourceDefinition,
    Skill, SkillRequirement, Slot, SlotKind, TaskKind, TaskProgress,
};
