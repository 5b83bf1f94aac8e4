//! Item catalog records.
//!
//! Items are identified by their string code. The definition carries the
//! equipment category, level gate, effects and an optional crafting recipe.

use super::actor::SlotKind;
use super::common::ItemStack;
use super::effect::{Effect, EffectKind};
use super::skill::Skill;

/// Item category. Equippable categories map onto a [`SlotKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    Weapon,
    Shield,
    Helmet,
    BodyArmor,
    LegArmor,
    Boots,
    Ring,
    Amulet,
    Artifact,
    /// Consumable that can be equipped in a utility slot and used in fights.
    Utility,
    /// Food and other consumables used outside fights.
    Consumable,
    Resource,
    Currency,
    Other,
}

impl ItemKind {
    /// Slot category this item can be equipped into, if any.
    pub const fn slot_kind(&self) -> Option<SlotKind> {
        match self {
            Self::Weapon => Some(SlotKind::Weapon),
            Self::Shield => Some(SlotKind::Shield),
            Self::Helmet => Some(SlotKind::Helmet),
            Self::BodyArmor => Some(SlotKind::BodyArmor),
            Self::LegArmor => Some(SlotKind::LegArmor),
            Self::Boots => Some(SlotKind::Boots),
            Self::Ring => Some(SlotKind::Ring),
            Self::Amulet => Some(SlotKind::Amulet),
            Self::Artifact => Some(SlotKind::Artifact),
            Self::Utility => Some(SlotKind::Utility),
            Self::Consumable | Self::Resource | Self::Currency | Self::Other => None,
        }
    }
}

/// Level gate on a skill other than the character level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillRequirement {
    pub skill: Skill,
    pub level: u32,
}

/// How an item is crafted: `items` consumed to produce `quantity` units.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recipe {
    pub skill: Skill,
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub quantity: u32,
    pub items: Vec<ItemStack>,
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn yes() -> bool {
    true
}

impl Recipe {
    /// Units of ingredients held at once while crafting one unit.
    pub fn footprint(&self) -> u32 {
        self.items.iter().map(|stack| stack.quantity).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub code: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub level: u32,
    pub kind: ItemKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<Effect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub craft: Option<Recipe>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Vec<SkillRequirement>,
    #[cfg_attr(feature = "serde", serde(default = "yes"))]
    pub tradeable: bool,
}

impl ItemDefinition {
    pub fn new(code: impl Into<String>, level: u32, kind: ItemKind) -> Self {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
            level,
            kind,
            effects: Vec::new(),
            craft: None,
            conditions: Vec::new(),
            tradeable: true,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, kind: EffectKind, value: i32) -> Self {
        self.effects.push(Effect::new(kind, value));
        self
    }

    #[must_use]
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.craft = Some(recipe);
        self
    }

    #[must_use]
    pub fn with_condition(mut self, skill: Skill, level: u32) -> Self {
        self.conditions.push(SkillRequirement { skill, level });
        self
    }

    /// Sum of all effects of `kind` on this item.
    pub fn effect(&self, kind: EffectKind) -> i32 {
        self.effects
            .iter()
            .filter(|effect| effect.kind == kind)
            .map(|effect| effect.value)
            .sum()
    }

    pub fn is_equippable(&self) -> bool {
        self.kind.slot_kind().is_some()
    }
}
