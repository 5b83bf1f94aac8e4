//! Flattened combat stats of one side of a fight.

use crate::config::CombatTuning;
use crate::env::GameData;
use crate::state::{
    Effect, EffectKind, ElementalStats, Equipment, MonsterDefinition, SlotKind,
};

/// A stack of HP-restoring utility items carried into a fight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UtilityStack {
    pub code: String,
    pub restore: i32,
    pub quantity: u32,
}

/// Everything the simulator needs to know about one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fighter {
    pub hp: i32,
    pub max_hp: i32,
    pub attack: ElementalStats,
    /// Per-element damage boost (percent).
    pub boost: ElementalStats,
    /// Damage boost applied to every element (percent).
    pub dmg: i32,
    pub resistance: ElementalStats,
    pub critical_strike: i32,
    pub initiative: i32,
    pub poison: i32,
    pub burn: i32,
    pub lifesteal: i32,
    pub healing: i32,
    pub antipoison: i32,
    pub utilities: Vec<UtilityStack>,
}

impl Fighter {
    /// Builds the fighter a character of `level` becomes with `equipment`.
    ///
    /// Unknown item codes are ignored. Utility items contribute their
    /// restore value as consumable charges; any other effect on them counts
    /// for the whole fight.
    pub fn from_loadout(
        level: u32,
        equipment: &Equipment,
        data: &GameData,
        tuning: &CombatTuning,
    ) -> Self {
        let mut fighter = Fighter {
            max_hp: tuning.character_base_hp(level),
            ..Fighter::default()
        };

        for (slot, equipped) in equipment.iter() {
            let Some(item) = data.item(&equipped.code) else {
                continue;
            };
            for effect in &item.effects {
                if slot.kind() == SlotKind::Utility && effect.kind == EffectKind::Restore {
                    continue;
                }
                fighter.apply(effect);
            }
            let restore = item.effect(EffectKind::Restore);
            if slot.kind() == SlotKind::Utility && restore > 0 && equipped.quantity > 0 {
                fighter.utilities.push(UtilityStack {
                    code: item.code.clone(),
                    restore,
                    quantity: equipped.quantity,
                });
            }
        }

        fighter.hp = fighter.max_hp;
        fighter
    }

    pub fn from_monster(monster: &MonsterDefinition) -> Self {
        let mut fighter = Fighter {
            hp: monster.hp,
            max_hp: monster.hp,
            attack: monster.attack,
            resistance: monster.resistance,
            critical_strike: monster.critical_strike,
            initiative: monster.initiative,
            ..Fighter::default()
        };
        for effect in &monster.effects {
            fighter.apply(effect);
        }
        fighter
    }

    /// Starts the fight at `hp` instead of full health.
    #[must_use]
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp.clamp(1, self.max_hp.max(1));
        self
    }

    fn apply(&mut self, effect: &Effect) {
        let value = effect.value;
        if let Some(element) = effect.kind.attack_element() {
            *self.attack.get_mut(element) += value;
            return;
        }
        if let Some(element) = effect.kind.boost_element() {
            *self.boost.get_mut(element) += value;
            return;
        }
        if let Some(element) = effect.kind.resistance_element() {
            *self.resistance.get_mut(element) += value;
            return;
        }
        match effect.kind {
            EffectKind::Dmg => self.dmg += value,
            EffectKind::Hp => self.max_hp += value,
            EffectKind::CriticalStrike => self.critical_strike += value,
            EffectKind::Initiative => self.initiative += value,
            EffectKind::Poison => self.poison += value,
            EffectKind::Burn => self.burn += value,
            EffectKind::Lifesteal => self.lifesteal += value,
            EffectKind::Healing => self.healing += value,
            EffectKind::Antipoison => self.antipoison += value,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ItemDefinition, ItemKind, Slot};

    fn data() -> GameData {
        GameData::new(
            vec![
                ItemDefinition::new("copper_dagger", 1, ItemKind::Weapon)
                    .with_effect(EffectKind::AttackAir, 6)
                    .with_effect(EffectKind::CriticalStrike, 35),
                ItemDefinition::new("copper_helmet", 1, ItemKind::Helmet)
                    .with_effect(EffectKind::Hp, 10)
                    .with_effect(EffectKind::ResEarth, 5),
                ItemDefinition::new("small_health_potion", 1, ItemKind::Utility)
                    .with_effect(EffectKind::Restore, 30),
            ],
            vec![],
            vec![],
            vec![],
            vec![],
        )
    }

    #[test]
    fn loadout_effects_are_summed() {
        let equipment = Equipment::builder()
            .item(Slot::Weapon, "copper_dagger")
            .item(Slot::Helmet, "copper_helmet")
            .stack(Slot::Utility1, "small_health_potion", 5)
            .build();

        let fighter = Fighter::from_loadout(1, &equipment, &data(), &CombatTuning::default());

        assert_eq!(fighter.max_hp, 130);
        assert_eq!(fighter.hp, 130);
        assert_eq!(fighter.attack.air, 6);
        assert_eq!(fighter.critical_strike, 35);
        assert_eq!(fighter.resistance.earth, 5);
        assert_eq!(fighter.utilities.len(), 1);
        assert_eq!(fighter.utilities[0].quantity, 5);
    }
}
