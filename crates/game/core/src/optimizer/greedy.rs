//! Greedy slot-by-slot loadout search.

use std::collections::BTreeSet;

use crate::combat::{FightOutcome, FightSimulator};
use crate::env::GameData;
use crate::state::{
    EffectKind, EquippedItem, Equipment, ItemDefinition, MonsterDefinition, Slot, SlotKind,
};

use super::candidates::CandidatePool;
use super::prune::prune_downgrades;

/// Largest stack a utility slot holds.
pub const UTILITY_STACK_LIMIT: u32 = 100;

/// A loadout paired with its simulated outcome and distance to the baseline.
#[derive(Clone, Debug)]
pub(crate) struct Scored {
    pub equipment: Equipment,
    pub outcome: FightOutcome,
    pub changes: usize,
}

impl Scored {
    /// Better outcome wins; equal outcomes prefer fewer changes.
    fn beats(&self, other: &Scored) -> bool {
        match self.outcome.compare(&other.outcome) {
            core::cmp::Ordering::Greater => true,
            core::cmp::Ordering::Equal => self.changes < other.changes,
            core::cmp::Ordering::Less => false,
        }
    }
}

pub(crate) struct Search<'a> {
    pub simulator: &'a FightSimulator,
    pub data: &'a GameData,
    pub level: u32,
    pub monster: &'a MonsterDefinition,
    pub baseline: &'a Equipment,
    pub pool: &'a CandidatePool<'a>,
}

impl<'a> Search<'a> {
    fn score(&self, equipment: Equipment) -> Scored {
        let outcome = self
            .simulator
            .simulate_loadout(self.level, &equipment, self.monster, self.data);
        let changes = equipment.differences(self.baseline);
        Scored {
            equipment,
            outcome,
            changes,
        }
    }

    /// Best loadout over every weapon choice, never worse than the baseline.
    pub fn run(&self) -> Scored {
        let mut best = self.score(self.baseline.clone());

        let weapons = prune_downgrades(self.pool.items(SlotKind::Weapon));
        let current_weapon = self.baseline.get(Slot::Weapon).cloned();
        let mut choices: Vec<Option<EquippedItem>> = vec![current_weapon];
        choices.extend(
            weapons
                .iter()
                .filter(|item| Some(item.code.as_str()) != self.baseline.code(Slot::Weapon))
                .map(|item| Some(EquippedItem::new(item.code.clone(), 1))),
        );

        for weapon in choices {
            let mut equipment = self.baseline.clone();
            equipment.set(Slot::Weapon, weapon);
            let candidate = self.fill_slots(self.score(equipment));
            if candidate.beats(&best) {
                best = candidate;
            }
        }

        best
    }

    /// Holding the weapon fixed, improves each remaining slot in turn.
    fn fill_slots(&self, mut current: Scored) -> Scored {
        for slot in Slot::all().filter(|slot| *slot != Slot::Weapon) {
            let kind = slot.kind();
            let options = prune_downgrades(self.pool.items(kind));
            for item in options {
                let Some(placed) = self.placement(&current.equipment, slot, item) else {
                    continue;
                };
                let mut equipment = current.equipment.clone();
                equipment.set(slot, Some(placed));
                let trial = self.score(equipment);
                if trial.beats(&current) {
                    current = trial;
                }
            }
        }
        current
    }

    /// What `item` would look like in `slot`, or `None` when it cannot go
    /// there given the rest of the loadout.
    fn placement(
        &self,
        equipment: &Equipment,
        slot: Slot,
        item: &ItemDefinition,
    ) -> Option<EquippedItem> {
        if equipment.code(slot) == Some(item.code.as_str()) {
            return None;
        }
        let elsewhere: u32 = equipment
            .iter()
            .filter(|(other, equipped)| *other != slot && equipped.code == item.code)
            .map(|(_, equipped)| equipped.quantity)
            .sum();

        if slot.kind().is_stackable() {
            if elsewhere > 0 || self.duplicates_utility_effect(equipment, slot, item) {
                return None;
            }
            let quantity = self.pool.available(&item.code).min(UTILITY_STACK_LIMIT);
            return (quantity > 0).then(|| EquippedItem::new(item.code.clone(), quantity));
        }

        (self.pool.available(&item.code) > elsewhere)
            .then(|| EquippedItem::new(item.code.clone(), 1))
    }

    fn duplicates_utility_effect(
        &self,
        equipment: &Equipment,
        slot: Slot,
        item: &ItemDefinition,
    ) -> bool {
        let beneficial = |item: &ItemDefinition| -> BTreeSet<EffectKind> {
            item.effects
                .iter()
                .filter(|effect| effect.value > 0)
                .map(|effect| effect.kind)
                .collect()
        };
        let wanted = beneficial(item);
        SlotKind::Utility
            .slots()
            .iter()
            .filter(|other| **other != slot)
            .filter_map(|other| equipment.code(*other))
            .filter_map(|code| self.data.item(code))
            .any(|other| !beneficial(other).is_disjoint(&wanted))
    }
}
