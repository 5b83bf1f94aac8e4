//! Deterministic game records, combat simulation and loadout search.
//!
//! `game-core` defines the canonical data the bot reasons about (items,
//! monsters, resources, maps, character snapshots) and exposes pure APIs
//! that the runtime calls as planning oracles:
//! - [`combat::FightSimulator`] predicts the outcome of a fight
//! - [`optimizer::EquipmentOptimizer`] searches for the best loadout
//!
//! Nothing in this crate performs I/O or holds shared mutable state, so the
//! same inputs always yield the same outputs.
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod optimizer;
pub mod state;

pub use combat::{FightOutcome, FightSimulator, Fighter, Winner};
pub use config::CombatTuning;
pub use env::{ActiveEvent, GameData};
pub use error::ErrorKind;
pub use optimizer::{EquipmentChange, EquipmentOptimizer, LoadoutPlan};
pub use state::{
    Character, ContentKind, Drop, Effect, EffectKind, Element, ElementalStats, EquippedItem,
    Equipment, Inventory, InventorySlot, ItemDefinition, ItemKind, ItemStack, Layer, MapContent,
    MapTile, MonsterDefinition, NpcDefinition, NpcOffer, Position, Recipe, ResourceDefinition,
    Skill, SkillRequirement, Slot, SlotKind, TaskKind, TaskProgress,
};
