//! Item and monster effects.
//!
//! Effects are flat `(kind, value)` pairs. The simulator folds them into a
//! [`crate::combat::Fighter`]; the optimizer compares them stat by stat.

use super::element::Element;

/// What an effect does. Values are flat points or percentages depending on
/// the kind; see each variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectKind {
    /// Base attack per element (flat).
    AttackFire,
    AttackEarth,
    AttackWater,
    AttackAir,
    /// Damage boost for every element (percent).
    Dmg,
    /// Damage boost for one element (percent).
    DmgFire,
    DmgEarth,
    DmgWater,
    DmgAir,
    /// Resistance per element (percent).
    ResFire,
    ResEarth,
    ResWater,
    ResAir,
    /// Extra max HP (flat).
    Hp,
    /// Critical strike chance (percent).
    CriticalStrike,
    /// Turn order priority.
    Initiative,
    /// Heals this percent of max HP on every healing period turn.
    Healing,
    /// On a critical strike, heals this percent of the damage dealt.
    Lifesteal,
    /// Flat damage per turn inflicted on the opponent from turn 1.
    Poison,
    /// Percent of the first turn's damage dealt again every turn.
    Burn,
    /// Reduces poison taken, once, by this many points.
    Antipoison,
    /// Consumable utility: restores this many HP when used.
    Restore,
    /// Gathering speed bonuses (percent). Irrelevant to combat.
    Mining,
    Woodcutting,
    Fishing,
    Alchemy,
    /// Extra inventory capacity (flat).
    InventorySpace,
    /// Experience bonus (percent).
    Wisdom,
    /// Drop rate bonus (percent).
    Prospecting,
}

impl EffectKind {
    pub fn attack_element(&self) -> Option<Element> {
        match self {
            Self::AttackFire => Some(Element::Fire),
            Self::AttackEarth => Some(Element::Earth),
            Self::AttackWater => Some(Element::Water),
            Self::AttackAir => Some(Element::Air),
            _ => None,
        }
    }

    pub fn boost_element(&self) -> Option<Element> {
        match self {
            Self::DmgFire => Some(Element::Fire),
            Self::DmgEarth => Some(Element::Earth),
            Self::DmgWater => Some(Element::Water),
            Self::DmgAir => Some(Element::Air),
            _ => None,
        }
    }

    pub fn resistance_element(&self) -> Option<Element> {
        match self {
            Self::ResFire => Some(Element::Fire),
            Self::ResEarth => Some(Element::Earth),
            Self::ResWater => Some(Element::Water),
            Self::ResAir => Some(Element::Air),
            _ => None,
        }
    }

    /// Whether the simulator reads this effect at all.
    pub fn affects_combat(&self) -> bool {
        !matches!(
            self,
            Self::Mining
                | Self::Woodcutting
                | Self::Fishing
                | Self::Alchemy
                | Self::InventorySpace
                | Self::Wisdom
                | Self::Prospecting
        )
    }
}

/// A single effect with its magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub kind: EffectKind,
    pub value: i32,
}

impl Effect {
    pub const fn new(kind: EffectKind, value: i32) -> Self {
        Self { kind, value }
    }
}
