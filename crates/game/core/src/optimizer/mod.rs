//! Equipment optimizer.
//!
//! Greedy search over equipment slots, scored by the
//! [`FightSimulator`](crate::combat::FightSimulator):
//!
//! 1. candidates are gated by level and skill, grouped per slot kind and
//!    pruned of strict downgrades ([`prune`])
//! 2. for every weapon choice, including the current weapon, the remaining
//!    slots are visited in [`Slot`] order and each keeps the single item that
//!    most improves the simulated outcome ([`greedy`])
//! 3. the best loadout across weapon choices wins, and the unchanged loadout
//!    is always a candidate, so the result never compares worse than it
//!
//! Ties on outcome go to the loadout with fewer changed slots.

pub mod candidates;
pub mod greedy;
pub mod prune;

use crate::combat::{FightOutcome, FightSimulator};
use crate::config::CombatTuning;
use crate::env::GameData;
use crate::state::{Character, EquippedItem, Equipment, MonsterDefinition, Slot};

pub use candidates::{Candidate, is_usable};
pub use greedy::UTILITY_STACK_LIMIT;
pub use prune::{dominates, prune_downgrades};

use candidates::CandidatePool;
use greedy::Search;

/// One slot that differs between the current and the proposed loadout.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentChange {
    pub slot: Slot,
    pub unequip: Option<EquippedItem>,
    pub equip: Option<EquippedItem>,
}

/// Best loadout found for a fight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadoutPlan {
    pub equipment: Equipment,
    pub outcome: FightOutcome,
    pub changes: Vec<EquipmentChange>,
}

impl LoadoutPlan {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }

    /// Item codes the plan equips that are not equipped now.
    pub fn required_items(&self) -> impl Iterator<Item = &EquippedItem> {
        self.changes.iter().filter_map(|change| change.equip.as_ref())
    }
}

#[derive(Clone, Debug, Default)]
pub struct EquipmentOptimizer {
    simulator: FightSimulator,
}

impl EquipmentOptimizer {
    pub fn new(tuning: CombatTuning) -> Self {
        Self {
            simulator: FightSimulator::new(tuning),
        }
    }

    pub fn with_simulator(simulator: FightSimulator) -> Self {
        Self { simulator }
    }

    pub fn simulator(&self) -> &FightSimulator {
        &self.simulator
    }

    /// Outcome of fighting `monster` with the current loadout.
    pub fn current_outcome(
        &self,
        character: &Character,
        monster: &MonsterDefinition,
        data: &GameData,
    ) -> FightOutcome {
        self.simulator
            .simulate_loadout(character.level, &character.equipment, monster, data)
    }

    /// Best loadout using the character's equipment plus its inventory.
    pub fn best_from_inventory(
        &self,
        character: &Character,
        monster: &MonsterDefinition,
        data: &GameData,
    ) -> LoadoutPlan {
        let candidates = Candidate::from_inventory(character);
        self.find_best_loadout(character, monster, &candidates, data)
    }

    /// Best loadout using the current equipment plus `candidates`.
    ///
    /// `candidates` need not be owned: callers widen it with bank stock or
    /// hypothetical items for what-if planning.
    pub fn find_best_loadout(
        &self,
        character: &Character,
        monster: &MonsterDefinition,
        candidates: &[Candidate],
        data: &GameData,
    ) -> LoadoutPlan {
        let pool = CandidatePool::build(character, candidates, data);
        let search = Search {
            simulator: &self.simulator,
            data,
            level: character.level,
            monster,
            baseline: &character.equipment,
            pool: &pool,
        };
        let best = search.run();
        let changes = diff(&character.equipment, &best.equipment);
        LoadoutPlan {
            equipment: best.equipment,
            outcome: best.outcome,
            changes,
        }
    }
}

fn diff(from: &Equipment, to: &Equipment) -> Vec<EquipmentChange> {
    Slot::all()
        .filter(|slot| from.code(*slot) != to.code(*slot))
        .map(|slot| EquipmentChange {
            slot,
            unequip: from.get(slot).cloned(),
            equip: to.get(slot).cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EffectKind, ElementalStats, Element, ItemDefinition, ItemKind};

    fn data() -> GameData {
        GameData::new(
            vec![
                ItemDefinition::new("wooden_stick", 1, ItemKind::Weapon)
                    .with_effect(EffectKind::AttackEarth, 4),
                ItemDefinition::new("copper_dagger", 1, ItemKind::Weapon)
                    .with_effect(EffectKind::AttackAir, 10),
                ItemDefinition::new("iron_sword", 10, ItemKind::Weapon)
                    .with_effect(EffectKind::AttackAir, 40),
                ItemDefinition::new("copper_helmet", 1, ItemKind::Helmet)
                    .with_effect(EffectKind::Hp, 20),
                ItemDefinition::new("small_health_potion", 1, ItemKind::Utility)
                    .with_effect(EffectKind::Restore, 30),
                ItemDefinition::new("minor_health_potion", 1, ItemKind::Utility)
                    .with_effect(EffectKind::Restore, 20),
            ],
            vec![],
            vec![],
            vec![],
            vec![],
        )
    }

    fn chicken() -> MonsterDefinition {
        let mut monster = MonsterDefinition::new("chicken", 1, 60);
        monster.attack = ElementalStats::ZERO.with(Element::Water, 4);
        monster
    }

    fn fighter() -> Character {
        let mut character = Character::new("ada", 1);
        character
            .equipment
            .equip(Slot::Weapon, EquippedItem::new("wooden_stick", 1));
        character
    }

    #[test]
    fn upgrades_weapon_from_candidates() {
        let data = data();
        let plan = EquipmentOptimizer::default().find_best_loadout(
            &fighter(),
            &chicken(),
            &[Candidate::new("copper_dagger", 1)],
            &data,
        );
        assert_eq!(plan.equipment.code(Slot::Weapon), Some("copper_dagger"));
        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].slot, Slot::Weapon);
        assert_eq!(
            plan.changes[0].unequip.as_ref().map(|item| item.code.as_str()),
            Some("wooden_stick")
        );
    }

    #[test]
    fn level_gated_items_are_ignored() {
        let data = data();
        let plan = EquipmentOptimizer::default().find_best_loadout(
            &fighter(),
            &chicken(),
            &[Candidate::new("iron_sword", 1)],
            &data,
        );
        assert!(plan.is_unchanged());
    }

    #[test]
    fn armor_that_only_adds_hp_is_kept_for_the_margin() {
        let data = data();
        let optimizer = EquipmentOptimizer::default();
        let plan = optimizer.find_best_loadout(
            &fighter(),
            &chicken(),
            &[Candidate::new("copper_helmet", 1)],
            &data,
        );
        let before = optimizer.current_outcome(&fighter(), &chicken(), &data);

        assert_eq!(plan.equipment.code(Slot::Helmet), Some("copper_helmet"));
        assert_eq!(plan.outcome.turns, before.turns);
        assert!(plan.outcome.player_hp > before.player_hp);
    }

    #[test]
    fn utility_slots_do_not_share_an_effect() {
        let data = data();
        let mut hard_hitter = chicken();
        hard_hitter.attack = ElementalStats::ZERO.with(Element::Water, 8);

        let plan = EquipmentOptimizer::default().find_best_loadout(
            &fighter(),
            &hard_hitter,
            &[
                Candidate::new("minor_health_potion", 5),
                Candidate::new("small_health_potion", 5),
            ],
            &data,
        );

        assert_eq!(plan.equipment.code(Slot::Utility1), Some("small_health_potion"));
        assert_eq!(plan.equipment.code(Slot::Utility2), None);
        assert!(plan.outcome.potions_used > 0);
    }
}
