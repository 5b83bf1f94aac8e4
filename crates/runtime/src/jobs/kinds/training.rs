use async_trait::async_trait;
use game_core::Skill;

use crate::actor::Placement;
use crate::jobs::context::JobContext;
use crate::jobs::error::{JobError, JobResult};
use crate::jobs::hooks::DepositResult;
use crate::jobs::job::Job;
use crate::jobs::planner::PlanOptions;

use super::{DepositAll, Execute, Fight, Gather, JobKind, ObtainItem, OptimizeLoadout, Outcome};

/// Units gathered, or fights fought, per training round.
const TRAINING_ROUND: u32 = 10;

/// Levels a skill by repeating the best activity for the current level
/// until `level` is reached.
///
/// Combat fights the highest level monster the optimizer says is safe,
/// gathering skills farm the highest resource they can work, and crafting
/// skills craft the highest recipe they know from scratch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainSkill {
    pub skill: Skill,
    pub level: u32,
}

impl TrainSkill {
    pub fn new(skill: Skill, level: u32) -> Self {
        Self { skill, level }
    }

    fn combat_round(&self, ctx: &JobContext) -> JobResult<Vec<JobKind>> {
        let character = ctx.character();
        let optimizer = ctx.optimizer();
        let target = ctx
            .data()
            .monsters()
            .filter(|monster| monster.level <= character.level + 1)
            .filter(|monster| {
                optimizer
                    .best_from_inventory(&character, monster, ctx.data())
                    .outcome
                    .should_fight
            })
            .max_by(|a, b| a.level.cmp(&b.level).then_with(|| b.code.cmp(&a.code)))
            .ok_or_else(|| {
                JobError::not_found(format!(
                    "no monster worth fighting at level {}",
                    character.level
                ))
            })?;
        Ok(vec![
            OptimizeLoadout::new(&target.code).into(),
            Fight::times(&target.code, TRAINING_ROUND).into(),
        ])
    }

    fn gathering_round(&self, ctx: &JobContext) -> JobResult<Vec<JobKind>> {
        let character = ctx.character();
        let level = character.skill_level(self.skill);
        let (resource, drop) = ctx
            .data()
            .resources()
            .filter(|resource| resource.skill == self.skill && resource.level <= level)
            .filter_map(|resource| resource.primary_drop().map(|drop| (resource, drop)))
            .max_by(|(a, _), (b, _)| a.level.cmp(&b.level).then_with(|| b.code.cmp(&a.code)))
            .ok_or_else(|| {
                JobError::not_found(format!("no {} resource at level {level}", self.skill))
            })?;
        let amount = TRAINING_ROUND.min(character.inventory.free_space()).max(1);
        Ok(vec![Gather::new(&resource.code, &drop.code, amount).into()])
    }

    fn crafting_round(&self, ctx: &JobContext) -> JobResult<Job> {
        let level = ctx.character().skill_level(self.skill);
        let item = ctx
            .data()
            .craftable_with(self.skill)
            .into_iter()
            .filter(|item| item.craft.as_ref().is_some_and(|recipe| recipe.level <= level))
            .next_back()
            .ok_or_else(|| {
                JobError::not_found(format!("no {} recipe at level {level}", self.skill))
            })?;
        let fresh = PlanOptions {
            use_inventory: false,
            ..PlanOptions::default()
        };
        Ok(Job::new(ObtainItem::new(&item.code, 1).with_options(fresh))
            .with_parent(ctx.job_id())
            .on_success(DepositResult {
                code: item.code.clone(),
            }))
    }
}

#[async_trait]
impl Execute for TrainSkill {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let character = ctx.character();
        let current = character.skill_level(self.skill);
        if current >= self.level {
            return Ok(Outcome::Completed);
        }

        let round = if ctx.config().is_nearly_full(&character.inventory) {
            vec![Job::new(DepositAll).with_parent(ctx.job_id())]
        } else if self.skill == Skill::Combat {
            parented(ctx, self.combat_round(ctx)?)
        } else if self.skill.is_gathering() {
            parented(ctx, self.gathering_round(ctx)?)
        } else {
            vec![self.crafting_round(ctx)?]
        };

        tracing::debug!(
            target: "runtime::job",
            character = ctx.name(),
            skill = %self.skill,
            level = current,
            goal = self.level,
            "training round"
        );
        ctx.splice_jobs(round, Placement::Before);
        Ok(Outcome::Suspended)
    }

    fn describe(&self) -> String {
        format!("train {} to {}", self.skill, self.level)
    }
}

fn parented(ctx: &JobContext, kinds: Vec<JobKind>) -> Vec<Job> {
    kinds
        .into_iter()
        .map(|kind| Job::new(kind).with_parent(ctx.job_id()))
        .collect()
}
