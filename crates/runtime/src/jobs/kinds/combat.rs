use async_trait::async_trait;
use game_core::{Fighter, ItemStack, MonsterDefinition};

use crate::actor::Placement;
use crate::jobs::context::JobContext;
use crate::jobs::error::{JobError, JobResult};
use crate::remote::{Destination, RemoteAction};

use super::{DepositAll, Execute, Outcome, sibling_job};

/// Fights a monster a number of times, or until enough of one drop has been
/// collected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fight {
    pub monster: String,
    goal: FightGoal,
    won: u32,
    collected: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum FightGoal {
    Times(u32),
    Collect(ItemStack),
}

impl Fight {
    pub fn times(monster: impl Into<String>, times: u32) -> Self {
        Self {
            monster: monster.into(),
            goal: FightGoal::Times(times),
            won: 0,
            collected: 0,
        }
    }

    /// Keeps fighting until `quantity` units of `code` dropped.
    pub fn until_collected(monster: impl Into<String>, code: impl Into<String>, quantity: u32) -> Self {
        Self {
            monster: monster.into(),
            goal: FightGoal::Collect(ItemStack::new(code, quantity)),
            won: 0,
            collected: 0,
        }
    }

    pub fn won(&self) -> u32 {
        self.won
    }

    pub(crate) fn record_win(&mut self, drops: &[ItemStack]) {
        self.won += 1;
        if let FightGoal::Collect(target) = &self.goal {
            self.collected += drops
                .iter()
                .filter(|stack| stack.code == target.code)
                .map(|stack| stack.quantity)
                .sum::<u32>();
        }
    }

    pub fn is_done(&self) -> bool {
        match &self.goal {
            FightGoal::Times(times) => self.won >= *times,
            FightGoal::Collect(target) => self.collected >= target.quantity,
        }
    }

    /// The same goal minus the progress made so far.
    fn remainder(&self) -> Fight {
        match &self.goal {
            FightGoal::Times(times) => Fight::times(&self.monster, times.saturating_sub(self.won)),
            FightGoal::Collect(target) => Fight::until_collected(
                &self.monster,
                &target.code,
                target.quantity.saturating_sub(self.collected),
            ),
        }
    }

    /// Refuses fights the simulator advises against even at full health,
    /// and rests first when current health is too low.
    async fn ensure_fit(&self, ctx: &JobContext, monster: &MonsterDefinition) -> JobResult<()> {
        let character = ctx.character();
        let simulator = ctx.optimizer().simulator();
        let player = Fighter::from_loadout(
            character.level,
            &character.equipment,
            ctx.data(),
            simulator.tuning(),
        );
        let opponent = Fighter::from_monster(monster);

        let rested = simulator.simulate(&player, &opponent);
        if !rested.is_win() {
            return Err(JobError::generic(format!(
                "{} cannot beat {} with the current loadout",
                character.name, monster.code
            )));
        }
        if !rested.should_fight {
            return Err(JobError::generic(format!(
                "{} would beat {} only past the safety margins ({} hp left, {} potions)",
                character.name, monster.code, rested.player_hp, rested.potions_used
            )));
        }

        if character.hp < character.max_hp {
            let now = simulator.simulate(&player.with_hp(character.hp), &opponent);
            if !now.should_fight {
                tracing::debug!(
                    target: "runtime::job",
                    character = ctx.name(),
                    hp = character.hp,
                    monster = %monster.code,
                    "resting before fight"
                );
                ctx.act(RemoteAction::Rest).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Execute for Fight {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let monster = ctx
            .data()
            .monster(&self.monster)
            .cloned()
            .ok_or_else(|| JobError::not_found(format!("unknown monster {}", self.monster)))?;
        if let FightGoal::Collect(target) = &self.goal
            && monster.drop_of(&target.code).is_none()
        {
            return Err(JobError::not_found(format!(
                "{} never drops {}",
                self.monster, target.code
            )));
        }

        while !self.is_done() {
            if ctx.character().inventory.is_full() {
                tracing::info!(
                    target: "runtime::job",
                    character = ctx.name(),
                    monster = %self.monster,
                    won = self.won,
                    "inventory full; depositing before fighting on"
                );
                let follow_ups = vec![
                    sibling_job(ctx, DepositAll),
                    sibling_job(ctx, self.remainder()),
                ];
                ctx.splice_jobs(follow_ups, Placement::After);
                return Ok(Outcome::Completed);
            }

            self.ensure_fit(ctx, &monster).await?;
            ctx.navigate(Destination::Monster(self.monster.clone())).await?;
            let response = ctx.act(RemoteAction::Fight).await?;
            match &response.fight {
                Some(report) if report.won => self.record_win(&response.drops),
                _ => {
                    return Err(JobError::generic(format!(
                        "lost a fight against {}",
                        self.monster
                    )));
                }
            }
        }
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        match &self.goal {
            FightGoal::Times(times) => format!("fight {} x{times}", self.monster),
            FightGoal::Collect(target) => {
                format!("fight {} for {} x{}", self.monster, target.code, target.quantity)
            }
        }
    }
}

/// Rests back to full health.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rest;

#[async_trait]
impl Execute for Rest {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let character = ctx.character();
        if character.hp < character.max_hp {
            ctx.act(RemoteAction::Rest).await?;
        }
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        "rest".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counted_fights_finish_after_enough_wins() {
        let mut fight = Fight::times("chicken", 2);
        assert!(!fight.is_done());
        fight.record_win(&[]);
        fight.record_win(&[]);
        assert!(fight.is_done());
        assert_eq!(fight.won(), 2);
    }

    #[test]
    fn collecting_fights_count_matching_drops_only() {
        let mut fight = Fight::until_collected("chicken", "feather", 3);
        fight.record_win(&[ItemStack::new("egg", 5), ItemStack::new("feather", 2)]);
        assert!(!fight.is_done());
        assert_eq!(
            fight.remainder(),
            Fight::until_collected("chicken", "feather", 1)
        );
        fight.record_win(&[ItemStack::new("feather", 1)]);
        assert!(fight.is_done());
    }

    #[test]
    fn labels_name_the_goal() {
        assert_eq!(Fight::times("chicken", 3).describe(), "fight chicken x3");
        assert_eq!(
            Fight::until_collected("chicken", "feather", 2).describe(),
            "fight chicken for feather x2"
        );
    }
}
