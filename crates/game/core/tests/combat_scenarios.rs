//! End-to-end checks of the simulator and the optimizer over a small world.

use game_core::optimizer::Candidate;
use game_core::{
    Character, EffectKind, Element, ElementalStats, EquipmentOptimizer, EquippedItem,
    FightSimulator, GameData, ItemDefinition, ItemKind, MonsterDefinition, Slot, Winner,
};
use proptest::prelude::*;

fn daggers() -> GameData {
    GameData::new(
        vec![
            ItemDefinition::new("air_dagger", 1, ItemKind::Weapon)
                .with_effect(EffectKind::AttackAir, 10),
            ItemDefinition::new("earth_dagger", 1, ItemKind::Weapon)
                .with_effect(EffectKind::AttackEarth, 10),
        ],
        vec![],
        vec![],
        vec![],
        vec![],
    )
}

fn earth_warded_monster() -> MonsterDefinition {
    let mut monster = MonsterDefinition::new("mushmush", 1, 60);
    monster.attack = ElementalStats::ZERO.with(Element::Water, 2);
    monster.resistance = ElementalStats::ZERO.with(Element::Earth, 25);
    monster
}

#[test]
fn optimizer_picks_the_element_the_monster_does_not_resist() {
    let data = daggers();
    let mut character = Character::new("ada", 1);
    character.inventory.add("air_dagger", 1);
    character.inventory.add("earth_dagger", 1);

    let plan = EquipmentOptimizer::default().best_from_inventory(
        &character,
        &earth_warded_monster(),
        &data,
    );

    assert_eq!(plan.equipment.code(Slot::Weapon), Some("air_dagger"));
    assert!(plan.outcome.is_win());
    assert!(plan.outcome.should_fight);
    // Six player turns interleaved with five monster turns.
    assert_eq!(plan.outcome.turns, 11);
}

#[test]
fn earth_dagger_needs_more_turns() {
    let data = daggers();
    let simulator = FightSimulator::default();
    let monster = earth_warded_monster();
    let air = simulator.simulate_loadout(
        1,
        &game_core::Equipment::builder().item(Slot::Weapon, "air_dagger").build(),
        &monster,
        &data,
    );
    let earth = simulator.simulate_loadout(
        1,
        &game_core::Equipment::builder().item(Slot::Weapon, "earth_dagger").build(),
        &monster,
        &data,
    );

    assert_eq!(earth.turns, 15);
    assert!(air.is_better_than(&earth));
}

#[test]
fn unarmed_character_cannot_win() {
    let data = daggers();
    let outcome = FightSimulator::default().simulate_loadout(
        1,
        &game_core::Equipment::empty(),
        &earth_warded_monster(),
        &data,
    );
    assert_eq!(outcome.winner, Winner::Monster);
    assert!(!outcome.should_fight);
}

fn arbitrary_item(code: &'static str, kind: ItemKind) -> impl Strategy<Value = ItemDefinition> {
    (0..30i32, 0..30i32, 0..40i32, 0..20i32).prop_map(move |(air, fire, hp, res)| {
        ItemDefinition::new(code, 1, kind)
            .with_effect(EffectKind::AttackAir, air)
            .with_effect(EffectKind::AttackFire, fire)
            .with_effect(EffectKind::Hp, hp)
            .with_effect(EffectKind::ResWater, res)
    })
}

fn arbitrary_monster() -> impl Strategy<Value = MonsterDefinition> {
    (20..400i32, 0..40i32, 0..50i32, 0..50i32, 0..60i32).prop_map(
        |(hp, water, air_res, fire_res, crit)| {
            let mut monster = MonsterDefinition::new("target", 1, hp);
            monster.attack = ElementalStats::ZERO.with(Element::Water, water);
            monster.resistance = ElementalStats::ZERO
                .with(Element::Air, air_res)
                .with(Element::Fire, fire_res);
            monster.critical_strike = crit;
            monster
        },
    )
}

proptest! {
    #[test]
    fn simulation_is_deterministic(monster in arbitrary_monster(), weapon in arbitrary_item("blade", ItemKind::Weapon)) {
        let data = GameData::new(vec![weapon], vec![], vec![], vec![], vec![]);
        let equipment = game_core::Equipment::builder().item(Slot::Weapon, "blade").build();
        let simulator = FightSimulator::default();

        let first = simulator.simulate_loadout(3, &equipment, &monster, &data);
        let second = simulator.simulate_loadout(3, &equipment, &monster, &data);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn best_loadout_is_never_worse_than_current(
        monster in arbitrary_monster(),
        current in arbitrary_item("old_blade", ItemKind::Weapon),
        blade in arbitrary_item("new_blade", ItemKind::Weapon),
        helm in arbitrary_item("helm", ItemKind::Helmet),
        ring in arbitrary_item("ring", ItemKind::Ring),
    ) {
        let data = GameData::new(vec![current, blade, helm, ring], vec![], vec![], vec![], vec![]);
        let mut character = Character::new("ada", 5);
        character.equipment.equip(Slot::Weapon, EquippedItem::new("old_blade", 1));
        let candidates = [
            Candidate::new("new_blade", 1),
            Candidate::new("helm", 1),
            Candidate::new("ring", 2),
        ];
        let optimizer = EquipmentOptimizer::default();

        let baseline = optimizer.current_outcome(&character, &monster, &data);
        let plan = optimizer.find_best_loadout(&character, &monster, &candidates, &data);

        prop_assert!(!baseline.is_better_than(&plan.outcome));
        prop_assert_eq!(plan.changes.len(), plan.equipment.differences(&character.equipment));
    }
}
