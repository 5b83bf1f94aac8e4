//! Tasks master interactions and the composite jobs running whole tasks.
use async_trait::async_trait;
use game_core::{TaskKind, TaskProgress};

use crate::jobs::context::JobContext;
use crate::jobs::error::{JobError, JobResult};
use crate::remote::{Destination, RemoteAction};

use super::{
    DepositAll, Execute, Fight, JobKind, ObtainItem, OptimizeLoadout, Outcome, TASKS_COIN,
    guard_resumptions,
};

/// Coins the tasks master takes for one exchange.
pub const TASK_EXCHANGE_COST: u32 = 6;

/// Coins the tasks master takes to cancel a task.
pub const TASK_CANCEL_COST: u32 = 1;

fn current_task(ctx: &JobContext) -> JobResult<TaskProgress> {
    ctx.character()
        .task
        .ok_or_else(|| JobError::not_found(format!("{} has no task", ctx.name())))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcceptTask {
    pub kind: TaskKind,
}

impl AcceptTask {
    pub fn new(kind: TaskKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl Execute for AcceptTask {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        if ctx.character().task.is_some() {
            return Ok(Outcome::Completed);
        }
        ctx.navigate(Destination::TasksMaster(self.kind)).await?;
        ctx.act(RemoteAction::TaskNew).await?;
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        format!("accept {} task", self.kind.as_str())
    }
}

/// Hands items to the tasks master toward the current items task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeTaskItems {
    pub code: String,
    pub quantity: u32,
}

impl TradeTaskItems {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }
}

#[async_trait]
impl Execute for TradeTaskItems {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let task = current_task(ctx)?;
        if task.kind != TaskKind::Items || task.code != self.code {
            return Err(JobError::generic(format!(
                "current task wants {} {}, not {}",
                task.kind.as_str(),
                task.code,
                self.code
            )));
        }
        let quantity = self.quantity.min(task.remaining());
        if quantity == 0 {
            return Ok(Outcome::Completed);
        }
        let held = ctx.character().held(&self.code);
        if held < quantity {
            return Err(JobError::generic(format!(
                "task trade needs {} x{quantity}, holding {held}",
                self.code
            )));
        }

        ctx.navigate(Destination::TasksMaster(TaskKind::Items)).await?;
        ctx.act(RemoteAction::TaskTrade {
            code: self.code.clone(),
            quantity,
        })
        .await?;
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        format!("trade {} x{} to tasks master", self.code, self.quantity)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompleteTask;

#[async_trait]
impl Execute for CompleteTask {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let task = current_task(ctx)?;
        if !task.is_finished() {
            return Err(JobError::generic(format!(
                "task {} is at {}/{}",
                task.code, task.progress, task.total
            )));
        }
        ctx.navigate(Destination::TasksMaster(task.kind)).await?;
        ctx.act(RemoteAction::TaskComplete).await?;
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        "complete task".to_owned()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CancelTask;

#[async_trait]
impl Execute for CancelTask {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let character = ctx.character();
        let Some(task) = character.task.as_ref() else {
            return Ok(Outcome::Completed);
        };
        if character.held(TASKS_COIN) < TASK_CANCEL_COST {
            return Err(JobError::generic("cancelling a task costs a tasks coin"));
        }
        ctx.navigate(Destination::TasksMaster(task.kind)).await?;
        ctx.act(RemoteAction::TaskCancel).await?;
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        "cancel task".to_owned()
    }
}

/// Trades tasks coins for a random reward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExchangeTaskCoins;

#[async_trait]
impl Execute for ExchangeTaskCoins {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        let coins = ctx.character().held(TASKS_COIN);
        if coins < TASK_EXCHANGE_COST {
            return Err(JobError::generic(format!(
                "exchange needs {TASK_EXCHANGE_COST} {TASKS_COIN}, holding {coins}"
            )));
        }
        ctx.navigate(Destination::TasksMaster(TaskKind::Items)).await?;
        ctx.act(RemoteAction::TaskExchange).await?;
        Ok(Outcome::Completed)
    }

    fn describe(&self) -> String {
        "exchange tasks coins".to_owned()
    }
}

/// Where a task-running composite stands, derived from the live snapshot.
enum TaskStep {
    Accept,
    Complete,
    Advance(TaskProgress),
    Done,
}

fn next_task_step(ctx: &JobContext, kind: TaskKind, started: bool) -> JobResult<TaskStep> {
    match ctx.character().task {
        None if started => Ok(TaskStep::Done),
        None => Ok(TaskStep::Accept),
        Some(task) if task.kind != kind => Err(JobError::generic(format!(
            "current task is a {} task",
            task.kind.as_str()
        ))),
        Some(task) if task.is_finished() => Ok(TaskStep::Complete),
        Some(task) => Ok(TaskStep::Advance(task)),
    }
}

/// Runs the current items task to completion, accepting one if needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemTask {
    started: bool,
}

impl ItemTask {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Execute for ItemTask {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        guard_resumptions(ctx, "items task")?;
        let step = next_task_step(ctx, TaskKind::Items, self.started)?;
        self.started = true;
        let children: Vec<JobKind> = match step {
            TaskStep::Done => return Ok(Outcome::Completed),
            TaskStep::Accept => vec![AcceptTask::new(TaskKind::Items).into()],
            TaskStep::Complete => vec![CompleteTask.into()],
            TaskStep::Advance(task) => {
                let character = ctx.character();
                if character.inventory.is_full() && character.held(&task.code) == 0 {
                    vec![DepositAll.into()]
                } else {
                    let room = character.held(&task.code) + character.inventory.free_space();
                    let batch = task.remaining().min(room.max(1));
                    vec![
                        ObtainItem::new(&task.code, batch).into(),
                        TradeTaskItems::new(&task.code, batch).into(),
                    ]
                }
            }
        };
        ctx.splice_children(children);
        Ok(Outcome::Suspended)
    }

    fn describe(&self) -> String {
        "run items task".to_owned()
    }
}

/// Runs the current monsters task to completion, accepting one if needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonsterTask {
    started: bool,
}

impl MonsterTask {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Execute for MonsterTask {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        guard_resumptions(ctx, "monsters task")?;
        let step = next_task_step(ctx, TaskKind::Monsters, self.started)?;
        self.started = true;
        let children: Vec<JobKind> = match step {
            TaskStep::Done => return Ok(Outcome::Completed),
            TaskStep::Accept => vec![AcceptTask::new(TaskKind::Monsters).into()],
            TaskStep::Complete => vec![CompleteTask.into()],
            TaskStep::Advance(task) => vec![
                OptimizeLoadout::new(&task.code).into(),
                Fight::times(&task.code, task.remaining()).into(),
            ],
        };
        ctx.splice_children(children);
        Ok(Outcome::Suspended)
    }

    fn describe(&self) -> String {
        "run monsters task".to_owned()
    }
}
