//! Equipment slots and the items placed in them.
//!
//! A loadout is an [`Equipment`] value: a map from [`Slot`] to the item code
//! (and, for utility slots, the stacked quantity) equipped there. The
//! optimizer builds hypothetical loadouts by cloning and editing this map.

use std::collections::BTreeMap;

use strum::{EnumIter, IntoEnumIterator};

/// Category of slot an item fits in. Rings, artifacts and utilities have
/// several slots of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlotKind {
    Weapon,
    Helmet,
    BodyArmor,
    LegArmor,
    Boots,
    Ring,
    Amulet,
    Artifact,
    Shield,
    Utility,
}

impl SlotKind {
    /// Concrete slots of this kind, in equip order.
    pub fn slots(&self) -> &'static [Slot] {
        match self {
            Self::Weapon => &[Slot::Weapon],
            Self::Helmet => &[Slot::Helmet],
            Self::BodyArmor => &[Slot::BodyArmor],
            Self::LegArmor => &[Slot::LegArmor],
            Self::Boots => &[Slot::Boots],
            Self::Ring => &[Slot::Ring1, Slot::Ring2],
            Self::Amulet => &[Slot::Amulet],
            Self::Artifact => &[Slot::Artifact1, Slot::Artifact2, Slot::Artifact3],
            Self::Shield => &[Slot::Shield],
            Self::Utility => &[Slot::Utility1, Slot::Utility2],
        }
    }

    /// Utility slots hold a stack; every other slot holds exactly one item.
    pub const fn is_stackable(&self) -> bool {
        matches!(self, Self::Utility)
    }
}

/// A concrete equipment slot.
///
/// Declaration order is the optimizer's greedy visiting order: armor pieces,
/// rings, amulet, artifacts, shield, then utilities last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Slot {
    Weapon,
    Helmet,
    BodyArmor,
    LegArmor,
    Boots,
    Ring1,
    Ring2,
    Amulet,
    Artifact1,
    Artifact2,
    Artifact3,
    Shield,
    Utility1,
    Utility2,
}

impl Slot {
    pub fn all() -> impl Iterator<Item = Slot> {
        Slot::iter()
    }

    pub const fn kind(&self) -> SlotKind {
        match self {
            Self::Weapon => SlotKind::Weapon,
            Self::Helmet => SlotKind::Helmet,
            Self::BodyArmor => SlotKind::BodyArmor,
            Self::LegArmor => SlotKind::LegArmor,
            Self::Boots => SlotKind::Boots,
            Self::Ring1 | Self::Ring2 => SlotKind::Ring,
            Self::Amulet => SlotKind::Amulet,
            Self::Artifact1 | Self::Artifact2 | Self::Artifact3 => SlotKind::Artifact,
            Self::Shield => SlotKind::Shield,
            Self::Utility1 | Self::Utility2 => SlotKind::Utility,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Helmet => "helmet",
            Self::BodyArmor => "body_armor",
            Self::LegArmor => "leg_armor",
            Self::Boots => "boots",
            Self::Ring1 => "ring1",
            Self::Ring2 => "ring2",
            Self::Amulet => "amulet",
            Self::Artifact1 => "artifact1",
            Self::Artifact2 => "artifact2",
            Self::Artifact3 => "artifact3",
            Self::Shield => "shield",
            Self::Utility1 => "utility1",
            Self::Utility2 => "utility2",
        }
    }
}

impl core::fmt::Display for Slot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquippedItem {
    pub code: String,
    pub quantity: u32,
}

impl EquippedItem {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }
}

/// Items currently equipped, keyed by slot. Missing slots are empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    slots: BTreeMap<Slot, EquippedItem>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> EquipmentBuilder {
        EquipmentBuilder::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&EquippedItem> {
        self.slots.get(&slot)
    }

    pub fn code(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).map(|item| item.code.as_str())
    }

    /// Places `item` in `slot`, returning what was there before.
    pub fn equip(&mut self, slot: Slot, item: EquippedItem) -> Option<EquippedItem> {
        self.slots.insert(slot, item)
    }

    pub fn unequip(&mut self, slot: Slot) -> Option<EquippedItem> {
        self.slots.remove(&slot)
    }

    /// Sets or clears a slot in one call.
    pub fn set(&mut self, slot: Slot, item: Option<EquippedItem>) {
        match item {
            Some(item) => {
                self.slots.insert(slot, item);
            }
            None => {
                self.slots.remove(&slot);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &EquippedItem)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    /// Units of `code` equipped across all slots.
    pub fn quantity_of(&self, code: &str) -> u32 {
        self.slots
            .values()
            .filter(|item| item.code == code)
            .map(|item| item.quantity)
            .sum()
    }

    /// Slot that currently holds `code`, if any.
    pub fn slot_of(&self, code: &str) -> Option<Slot> {
        self.slots
            .iter()
            .find(|(_, item)| item.code == code)
            .map(|(slot, _)| *slot)
    }

    /// Number of slots whose content differs between the two loadouts.
    pub fn differences(&self, other: &Equipment) -> usize {
        Slot::all()
            .filter(|slot| self.code(*slot) != other.code(*slot))
            .count()
    }
}

/// Builder for constructing equipment in tests and fixtures.
#[derive(Default)]
pub struct EquipmentBuilder {
    slots: BTreeMap<Slot, EquippedItem>,
}

impl EquipmentBuilder {
    pub fn item(mut self, slot: Slot, code: impl Into<String>) -> Self {
        self.slots.insert(slot, EquippedItem::new(code, 1));
        self
    }

    pub fn stack(mut self, slot: Slot, code: impl Into<String>, quantity: u32) -> Self {
        self.slots.insert(slot, EquippedItem::new(code, quantity));
        self
    }

    pub fn build(self) -> Equipment {
        Equipment { slots: self.slots }
    }
}
