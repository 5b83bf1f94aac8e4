//! Damage elements and per-element stat blocks.

use strum::{EnumIter, IntoEnumIterator};

/// Damage element. Every attack and resistance is expressed per element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Element {
    Fire,
    Earth,
    Water,
    Air,
}

impl Element {
    pub fn all() -> impl Iterator<Item = Element> {
        Element::iter()
    }
}

/// One signed value per element (attack, damage boost, or resistance).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ElementalStats {
    pub fire: i32,
    pub earth: i32,
    pub water: i32,
    pub air: i32,
}

impl ElementalStats {
    pub const ZERO: Self = Self {
        fire: 0,
        earth: 0,
        water: 0,
        air: 0,
    };

    pub fn get(&self, element: Element) -> i32 {
        match element {
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Water => self.water,
            Element::Air => self.air,
        }
    }

    pub fn get_mut(&mut self, element: Element) -> &mut i32 {
        match element {
            Element::Fire => &mut self.fire,
            Element::Earth => &mut self.earth,
            Element::Water => &mut self.water,
            Element::Air => &mut self.air,
        }
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, element: Element, value: i32) -> Self {
        *self.get_mut(element) = value;
        self
    }

    pub fn total(&self) -> i32 {
        self.fire + self.earth + self.water + self.air
    }
}
