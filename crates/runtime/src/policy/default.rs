use game_core::{ContentKind, TaskKind};

use crate::jobs::JobKind;
use crate::jobs::kinds::{
    CompleteTask, DepositAll, Fight, Gather, ItemTask, MonsterTask, OptimizeLoadout, TrainSkill,
};

use super::{Decision, DecisionPolicy, PolicyView};

const EVENT_FIGHTS: u32 = 5;
const EVENT_GATHERS: u32 = 20;

/// Chores first, then live world events, then tasks, then skill training.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPolicy;

impl DefaultPolicy {
    fn chores(view: &PolicyView<'_>) -> Option<Decision> {
        let character = view.character;
        if view.config.is_nearly_full(&character.inventory) {
            return Some(Decision::new("inventory nearly full", vec![DepositAll.into()]));
        }
        if character.task.as_ref().is_some_and(|task| task.is_finished()) {
            return Some(Decision::new("task finished", vec![CompleteTask.into()]));
        }
        None
    }

    fn events(view: &PolicyView<'_>) -> Option<Decision> {
        let character = view.character;
        let data = view.world.data();
        let events = view.world.active_events(view.now);

        let monster = events
            .iter()
            .filter(|event| event.content.kind == ContentKind::Monster)
            .filter_map(|event| data.monster(&event.content.code))
            .filter(|monster| {
                view.optimizer
                    .best_from_inventory(character, monster, data)
                    .outcome
                    .should_fight
            })
            .max_by(|a, b| a.level.cmp(&b.level).then_with(|| b.code.cmp(&a.code)));
        if let Some(monster) = monster {
            return Some(Decision::new(
                "world event monster",
                vec![
                    OptimizeLoadout::new(&monster.code).into(),
                    Fight::times(&monster.code, EVENT_FIGHTS).into(),
                ],
            ));
        }

        let room = character.inventory.free_space();
        if room == 0 {
            return None;
        }
        events
            .iter()
            .filter(|event| event.content.kind == ContentKind::Resource)
            .filter_map(|event| data.resource(&event.content.code))
            .filter(|resource| character.skill_level(resource.skill) >= resource.level)
            .filter_map(|resource| resource.primary_drop().map(|drop| (resource, drop)))
            .max_by(|(a, _), (b, _)| a.level.cmp(&b.level).then_with(|| b.code.cmp(&a.code)))
            .map(|(resource, drop)| {
                Decision::new(
                    "world event resource",
                    vec![Gather::new(&resource.code, &drop.code, room.min(EVENT_GATHERS)).into()],
                )
            })
    }

    fn tasks(view: &PolicyView<'_>) -> Option<Decision> {
        let wanted = view.settings?.tasks?;
        let character = view.character;
        let kind = character.task.as_ref().map_or(wanted, |task| task.kind);

        if let Some(task) = &character.task {
            match task.kind {
                // Already being fetched by an earlier plan.
                TaskKind::Items if view.wishes.outstanding(&task.code) > 0 => return None,
                TaskKind::Monsters => {
                    let data = view.world.data();
                    let monster = data.monster(&task.code)?;
                    let plan = view.optimizer.best_from_inventory(character, monster, data);
                    if !plan.outcome.should_fight {
                        tracing::debug!(
                            target: "runtime::policy",
                            character = %character.name,
                            monster = %task.code,
                            "task monster out of reach"
                        );
                        return None;
                    }
                }
                TaskKind::Items => {}
            }
        }

        let job: JobKind = match kind {
            TaskKind::Items => ItemTask::new().into(),
            TaskKind::Monsters => MonsterTask::new().into(),
        };
        Some(Decision::new("task", vec![job]))
    }

    fn training(view: &PolicyView<'_>) -> Option<Decision> {
        let character = view.character;
        view.settings?
            .train
            .iter()
            .find(|goal| character.skill_level(goal.skill) < goal.level)
            .map(|goal| {
                Decision::new(
                    "skill training",
                    vec![TrainSkill::new(goal.skill, goal.level).into()],
                )
            })
    }
}

impl DecisionPolicy for DefaultPolicy {
    fn decide(&self, view: &PolicyView<'_>) -> Option<Decision> {
        Self::chores(view)
            .or_else(|| Self::events(view))
            .or_else(|| Self::tasks(view))
            .or_else(|| Self::training(view))
    }
}
