//! Monster catalog records.

use super::effect::{Effect, EffectKind};
use super::element::ElementalStats;

/// Possible loot of a monster or resource. `rate` is "1 in rate".
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drop {
    pub code: String,
    pub rate: u32,
    pub min_quantity: u32,
    pub max_quantity: u32,
}

impl Drop {
    pub fn new(code: impl Into<String>, rate: u32, min_quantity: u32, max_quantity: u32) -> Self {
        Self {
            code: code.into(),
            rate: rate.max(1),
            min_quantity,
            max_quantity: max_quantity.max(min_quantity),
        }
    }

    /// Mean units obtained per attempt.
    pub fn expected_quantity(&self) -> f64 {
        (self.min_quantity + self.max_quantity) as f64 / 2.0 / self.rate.max(1) as f64
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterDefinition {
    pub code: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub level: u32,
    pub hp: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack: ElementalStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistance: ElementalStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub critical_strike: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub initiative: i32,
    /// Special effects (poison, burn, lifesteal, healing).
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<Effect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub drops: Vec<Drop>,
}

impl MonsterDefinition {
    pub fn new(code: impl Into<String>, level: u32, hp: i32) -> Self {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
            level,
            hp,
            attack: ElementalStats::ZERO,
            resistance: ElementalStats::ZERO,
            critical_strike: 0,
            initiative: 0,
            effects: Vec::new(),
            drops: Vec::new(),
        }
    }

    pub fn effect(&self, kind: EffectKind) -> i32 {
        self.effects
            .iter()
            .filter(|effect| effect.kind == kind)
            .map(|effect| effect.value)
            .sum()
    }

    #[must_use]
    pub fn with_drop(mut self, code: impl Into<String>, rate: u32, quantity: u32) -> Self {
        self.drops.push(Drop::new(code, rate, quantity, quantity));
        self
    }

    pub fn drop_of(&self, code: &str) -> Option<&Drop> {
        self.drops.iter().find(|drop| drop.code == code)
    }
}
