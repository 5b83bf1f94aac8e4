//! Character snapshot types.
//!
//! This module contains everything specific to a playable character:
//! - Character: the snapshot returned by every remote action
//! - Equipment: slots and the loadout stored in them
//! - Inventory: bounded item storage

pub mod equipment;
pub mod inventory;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

pub use equipment::{EquippedItem, Equipment, EquipmentBuilder, Slot, SlotKind};
pub use inventory::{Inventory, InventorySlot};

use super::common::Position;
use super::skill::Skill;
use super::task::TaskProgress;

/// Snapshot of one character as last reported by the server.
///
/// The server is the source of truth: every action response carries a fresh
/// snapshot which replaces the previous one wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub name: String,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub gold: u32,
    pub position: Position,
    /// Levels of non-combat skills. Missing skills are level 1.
    pub skills: BTreeMap<Skill, u32>,
    pub inventory: Inventory,
    pub equipment: Equipment,
    /// The server rejects actions until this instant.
    pub cooldown_expiration: Option<DateTime<Utc>>,
    pub task: Option<TaskProgress>,
}

impl Character {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
            hp: 0,
            max_hp: 0,
            gold: 0,
            position: Position::ORIGIN,
            skills: BTreeMap::new(),
            inventory: Inventory::default(),
            equipment: Equipment::default(),
            cooldown_expiration: None,
            task: None,
        }
    }

    pub fn skill_level(&self, skill: Skill) -> u32 {
        match skill {
            Skill::Combat => self.level,
            _ => self.skills.get(&skill).copied().unwrap_or(1),
        }
    }

    /// Time left before the server accepts another action.
    pub fn cooldown_remaining(&self, now: DateTime<Utc>) -> std::time::Duration {
        self.cooldown_expiration
            .and_then(|until| (until - now).to_std().ok())
            .unwrap_or_default()
    }

    /// Units of `code` in the inventory (equipped items excluded).
    pub fn held(&self, code: &str) -> u32 {
        self.inventory.quantity_of(code)
    }

    /// Units of `code` in the inventory or equipped.
    pub fn owned(&self, code: &str) -> u32 {
        self.inventory.quantity_of(code) + self.equipment.quantity_of(code)
    }

    pub fn hp_percent(&self) -> u32 {
        if self.max_hp <= 0 {
            return 0;
        }
        (self.hp.max(0) as i64 * 100 / self.max_hp as i64) as u32
    }
}
