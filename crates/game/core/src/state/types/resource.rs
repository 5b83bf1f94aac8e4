//! Gatherable resource records.

use super::monster::Drop;
use super::skill::Skill;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceDefinition {
    pub code: String,
    pub skill: Skill,
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub drops: Vec<Drop>,
}

impl ResourceDefinition {
    pub fn new(code: impl Into<String>, skill: Skill, level: u32) -> Self {
        Self {
            code: code.into(),
            skill,
            level,
            drops: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_drop(mut self, code: impl Into<String>, rate: u32, quantity: u32) -> Self {
        self.drops.push(Drop::new(code, rate, quantity, quantity));
        self
    }

    pub fn drop_of(&self, code: &str) -> Option<&Drop> {
        self.drops.iter().find(|drop| drop.code == code)
    }

    /// The drop gathered on every successful attempt (lowest rate).
    pub fn primary_drop(&self) -> Option<&Drop> {
        self.drops.iter().min_by_key(|drop| drop.rate)
    }
}
