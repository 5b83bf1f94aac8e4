//! Turn loop and multi-pass aggregation.

use crate::config::CombatTuning;
use crate::env::GameData;
use crate::state::{Equipment, MonsterDefinition};

use super::crit::CritAccumulator;
use super::damage::turn_damage;
use super::fighter::{Fighter, UtilityStack};
use super::outcome::{FightOutcome, PassResult, Winner};

/// Deterministic fight simulator.
///
/// One simulation runs a pass per configured critical-strike offset and
/// aggregates them into a single [`FightOutcome`]. The simulator holds no
/// mutable state; it can be shared freely and called repeatedly.
#[derive(Clone, Debug, Default)]
pub struct FightSimulator {
    tuning: CombatTuning,
}

/// Mutable per-side state of one pass.
struct Side<'a> {
    stats: &'a Fighter,
    hp: i32,
    crit: CritAccumulator,
    own_turns: u32,
    /// Damage taken at the start of each own turn.
    poisoned: i32,
    burn_base: i32,
    burn_percent: i32,
    burn_ticks: u32,
    utilities: Vec<UtilityStack>,
    potions_used: u32,
}

impl<'a> Side<'a> {
    fn new(stats: &'a Fighter, offset: u32) -> Self {
        Self {
            stats,
            hp: stats.hp,
            crit: CritAccumulator::new(stats.critical_strike, offset),
            own_turns: 0,
            poisoned: 0,
            burn_base: 0,
            burn_percent: 0,
            burn_ticks: 0,
            utilities: stats.utilities.clone(),
            potions_used: 0,
        }
    }

    fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount.max(0)).min(self.stats.max_hp);
    }

    /// Damage-over-time effects applied before the side acts.
    fn suffer_afflictions(&mut self) {
        if self.poisoned > 0 {
            self.hp -= self.poisoned;
        }
        if self.burn_percent > 0 {
            self.hp -= percent_of(self.burn_base, self.burn_percent);
            if self.burn_ticks < 2 {
                self.burn_percent -= 1;
            }
            self.burn_ticks += 1;
        }
    }

    fn recover(&mut self, tuning: &CombatTuning) {
        let healing = self.stats.healing;
        if healing > 0
            && tuning.healing_period > 0
            && self.own_turns % tuning.healing_period == 0
        {
            self.heal(percent_of(self.stats.max_hp, healing));
        }

        let threshold = percent_of(self.stats.max_hp, tuning.utility_hp_percent as i32);
        if self.hp > threshold {
            return;
        }
        let Some(stack) = self.utilities.iter_mut().find(|stack| stack.quantity > 0) else {
            return;
        };
        stack.quantity -= 1;
        let restore = stack.restore;
        self.potions_used += 1;
        self.heal(restore);
    }
}

fn percent_of(value: i32, percent: i32) -> i32 {
    (value as f64 * percent as f64 / 100.0).round() as i32
}

/// Rounded mean of `values`.
fn average<I: ExactSizeIterator<Item = i64>>(values: I) -> i64 {
    let count = values.len().max(1) as f64;
    (values.sum::<i64>() as f64 / count).round() as i64
}

impl FightSimulator {
    pub fn new(tuning: CombatTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    /// Simulates a character of `level` wearing `equipment` against `monster`.
    pub fn simulate_loadout(
        &self,
        level: u32,
        equipment: &Equipment,
        monster: &MonsterDefinition,
        data: &GameData,
    ) -> FightOutcome {
        let player = Fighter::from_loadout(level, equipment, data, &self.tuning);
        self.simulate(&player, &Fighter::from_monster(monster))
    }

    /// Runs every configured pass and aggregates them.
    pub fn simulate(&self, player: &Fighter, monster: &Fighter) -> FightOutcome {
        let passes: Vec<PassResult> = if self.tuning.crit_offsets.is_empty() {
            vec![self.run_pass(player, monster, 0)]
        } else {
            self.tuning
                .crit_offsets
                .iter()
                .map(|offset| self.run_pass(player, monster, *offset))
                .collect()
        };
        self.aggregate(&passes, player.max_hp)
    }

    /// Plays one fight to the end with both accumulators shifted by `offset`.
    pub fn run_pass(&self, player: &Fighter, monster: &Fighter, offset: u32) -> PassResult {
        let mut sides = [Side::new(player, offset), Side::new(monster, offset)];
        // Ties go to the player.
        let mut attacker = if player.initiative >= monster.initiative { 0 } else { 1 };
        let mut turns = 0;
        let mut winner = Winner::Monster;

        while turns < self.tuning.max_turns {
            turns += 1;
            let defender = 1 - attacker;
            let [first, second] = &mut sides;
            let (att, def) = if attacker == 0 {
                (first, second)
            } else {
                (second, first)
            };

            att.own_turns += 1;
            att.suffer_afflictions();
            if att.hp <= 0 {
                winner = side_winner(defender);
                break;
            }
            att.recover(&self.tuning);

            if att.own_turns == 1 && att.stats.poison > 0 {
                def.poisoned = (att.stats.poison - def.stats.antipoison).max(0);
            }

            let critical = att.crit.roll();
            let damage = turn_damage(att.stats, def.stats, critical);
            def.hp -= damage;
            if critical && att.stats.lifesteal > 0 {
                att.heal(percent_of(damage, att.stats.lifesteal));
            }
            if att.own_turns == 1 && att.stats.burn > 0 {
                def.burn_base = damage;
                def.burn_percent = att.stats.burn;
            }

            if def.hp <= 0 {
                winner = side_winner(attacker);
                break;
            }
            attacker = defender;
        }

        let [player_side, monster_side] = sides;
        PassResult {
            winner,
            player_hp: player_side.hp.max(0),
            monster_hp: monster_side.hp.max(0),
            turns,
            potions_used: player_side.potions_used,
        }
    }

    fn aggregate(&self, passes: &[PassResult], max_hp: i32) -> FightOutcome {
        let required = self.tuning.required_agreement();
        let wins = passes.iter().filter(|pass| pass.winner == Winner::Player).count();
        let safe = passes
            .iter()
            .filter(|pass| {
                self.is_safe(pass.winner, pass.player_hp, pass.potions_used, max_hp)
            })
            .count();

        let winner = if wins >= required {
            Winner::Player
        } else {
            Winner::Monster
        };
        let player_hp = average(passes.iter().map(|pass| pass.player_hp as i64)) as i32;
        let monster_hp = average(passes.iter().map(|pass| pass.monster_hp as i64)) as i32;
        let turns = average(passes.iter().map(|pass| pass.turns as i64)) as u32;
        let potions_used = average(passes.iter().map(|pass| pass.potions_used as i64)) as u32;

        let should_fight =
            safe >= required && self.is_safe(winner, player_hp, potions_used, max_hp);

        FightOutcome {
            winner,
            player_hp,
            player_max_hp: max_hp,
            monster_hp,
            turns,
            potions_used,
            should_fight,
        }
    }

    fn is_safe(&self, winner: Winner, player_hp: i32, potions_used: u32, max_hp: i32) -> bool {
        winner == Winner::Player
            && player_hp as i64 * 100 >= max_hp as i64 * self.tuning.min_hp_percent as i64
            && potions_used <= self.tuning.max_potions
    }
}

fn side_winner(index: usize) -> Winner {
    if index == 0 {
        Winner::Player
    } else {
        Winner::Monster
    }
}
