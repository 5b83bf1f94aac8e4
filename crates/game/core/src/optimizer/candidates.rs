//! Candidate items and their level/skill gates.

use std::collections::{BTreeMap, HashMap};

use crate::env::GameData;
use crate::state::{Character, ItemDefinition, SlotKind};

/// An item the optimizer may equip, with the units available for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub code: String,
    pub quantity: u32,
}

impl Candidate {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }

    /// Every stack in the character's inventory.
    pub fn from_inventory(character: &Character) -> Vec<Candidate> {
        character
            .inventory
            .stacks()
            .map(|stack| Candidate::new(stack.code, stack.quantity))
            .collect()
    }
}

/// Whether `character` meets the level and skill gates of `item`.
pub fn is_usable(character: &Character, item: &ItemDefinition) -> bool {
    item.level <= character.level
        && item
            .conditions
            .iter()
            .all(|condition| character.skill_level(condition.skill) >= condition.level)
}

/// Usable, equippable candidates grouped by slot kind, plus the units
/// available per code (equipped units included).
pub(crate) struct CandidatePool<'a> {
    pub by_kind: BTreeMap<SlotKind, Vec<&'a ItemDefinition>>,
    pub available: HashMap<String, u32>,
}

impl<'a> CandidatePool<'a> {
    pub fn build(character: &Character, candidates: &[Candidate], data: &'a GameData) -> Self {
        let mut available: HashMap<String, u32> = HashMap::new();
        for (_, equipped) in character.equipment.iter() {
            *available.entry(equipped.code.clone()).or_default() += equipped.quantity;
        }
        for candidate in candidates {
            *available.entry(candidate.code.clone()).or_default() += candidate.quantity;
        }

        let mut by_kind: BTreeMap<SlotKind, Vec<&'a ItemDefinition>> = BTreeMap::new();
        for candidate in candidates {
            let Some(item) = data.item(&candidate.code) else {
                continue;
            };
            let Some(kind) = item.kind.slot_kind() else {
                continue;
            };
            if candidate.quantity == 0 || !is_usable(character, item) {
                continue;
            }
            let items = by_kind.entry(kind).or_default();
            if !items.iter().any(|known| known.code == item.code) {
                items.push(item);
            }
        }

        Self { by_kind, available }
    }

    pub fn items(&self, kind: SlotKind) -> &[&'a ItemDefinition] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn available(&self, code: &str) -> u32 {
        self.available.get(code).copied().unwrap_or(0)
    }
}
