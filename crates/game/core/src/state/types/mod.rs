//! Plain data types shared by the simulator, optimizer and runtime.
mod actor;
mod common;
mod effect;
mod element;
mod item;
mod map;
mod monster;
mod npc;
mod resource;
mod skill;
mod task;

pub use actor::{Character, EquippedItem, Equipment, Inventory, InventorySlot, Slot, SlotKind};
pub use common::{ItemStack, Layer, Position};
pub use effect::{Effect, EffectKind};
pub use element::{Element, ElementalStats};
pub use item::{ItemDefinition, ItemKind, Recipe, SkillRequirement};
pub use map::{ContentKind, MapContent, MapTile};
pub use monster::{Drop, MonsterDefinition};
pub use npc::{NpcDefinition, NpcOffer};
pub use resource::ResourceDefinition;
pub use skill::Skill;
pub use task::{TaskKind, TaskProgress};
