//! Concrete job variants.
//!
//! Primitive jobs issue remote actions directly. Composite jobs never act:
//! they compute a plan, splice it in front of themselves and suspend, and the
//! scheduler runs them again once the plan has drained.
mod bank;
mod combat;
mod crafting;
mod equipment;
mod gathering;
mod obtain;
mod tasks;
mod trade;
mod training;

use async_trait::async_trait;

pub use bank::{Deposit, DepositAll, DepositGold, Withdraw, WithdrawGold};
pub use combat::{Fight, Rest};
pub use crafting::Craft;
pub use equipment::{Equip, OptimizeLoadout, Unequip, UseItem};
pub use gathering::Gather;
pub use obtain::{GatherMaterials, ObtainItem};
pub use tasks::{
    AcceptTask, CancelTask, CompleteTask, ExchangeTaskCoins, ItemTask, MonsterTask,
    TASK_CANCEL_COST, TASK_EXCHANGE_COST, TradeTaskItems,
};
pub use trade::{NpcBuy, NpcSell};
pub use training::TrainSkill;

use super::context::JobContext;
use super::error::{JobError, JobResult};
use super::hooks::{ReleaseReservation, ReserveBankItem};
use super::job::{Job, JobId};

/// Item handed out for completing a task and spent to cancel or exchange.
pub const TASKS_COIN: &str = "tasks_coin";

/// How a run of a job ended when it did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Yielded; run again later from the top.
    Suspended,
}

#[async_trait]
pub trait Execute: Send {
    async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome>;

    fn describe(&self) -> String;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobKind {
    Fight(Fight),
    Rest(Rest),
    Gather(Gather),
    Craft(Craft),
    Withdraw(Withdraw),
    Deposit(Deposit),
    DepositAll(DepositAll),
    WithdrawGold(WithdrawGold),
    DepositGold(DepositGold),
    Equip(Equip),
    Unequip(Unequip),
    UseItem(UseItem),
    NpcBuy(NpcBuy),
    NpcSell(NpcSell),
    AcceptTask(AcceptTask),
    TradeTaskItems(TradeTaskItems),
    CompleteTask(CompleteTask),
    CancelTask(CancelTask),
    ExchangeTaskCoins(ExchangeTaskCoins),
    ObtainItem(ObtainItem),
    GatherMaterials(GatherMaterials),
    ItemTask(ItemTask),
    MonsterTask(MonsterTask),
    TrainSkill(TrainSkill),
    OptimizeLoadout(OptimizeLoadout),
}

macro_rules! dispatch {
    ($kind:expr, $job:ident => $body:expr) => {
        match $kind {
            JobKind::Fight($job) => $body,
            JobKind::Rest($job) => $body,
            JobKind::Gather($job) => $body,
            JobKind::Craft($job) => $body,
            JobKind::Withdraw($job) => $body,
            JobKind::Deposit($job) => $body,
            JobKind::DepositAll($job) => $body,
            JobKind::WithdrawGold($job) => $body,
            JobKind::DepositGold($job) => $body,
            JobKind::Equip($job) => $body,
            JobKind::Unequip($job) => $body,
            JobKind::UseItem($job) => $body,
            JobKind::NpcBuy($job) => $body,
            JobKind::NpcSell($job) => $body,
            JobKind::AcceptTask($job) => $body,
            JobKind::TradeTaskItems($job) => $body,
            JobKind::CompleteTask($job) => $body,
            JobKind::CancelTask($job) => $body,
            JobKind::ExchangeTaskCoins($job) => $body,
            JobKind::ObtainItem($job) => $body,
            JobKind::GatherMaterials($job) => $body,
            JobKind::ItemTask($job) => $body,
            JobKind::MonsterTask($job) => $body,
            JobKind::TrainSkill($job) => $body,
            JobKind::OptimizeLoadout($job) => $body,
        }
    };
}

impl JobKind {
    pub async fn execute(&mut self, ctx: &JobContext) -> JobResult<Outcome> {
        dispatch!(self, job => job.execute(ctx).await)
    }

    /// Human readable label used in logs, events and job listings.
    pub fn describe(&self) -> String {
        dispatch!(self, job => job.describe())
    }

    /// Composite jobs plan and splice instead of acting.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::ObtainItem(_)
                | Self::GatherMaterials(_)
                | Self::ItemTask(_)
                | Self::MonsterTask(_)
                | Self::TrainSkill(_)
                | Self::OptimizeLoadout(_)
        )
    }
}

macro_rules! impl_from_kind {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for JobKind {
                fn from(job: $variant) -> Self {
                    JobKind::$variant(job)
                }
            }
        )*
    };
}

impl_from_kind!(
    Fight,
    Rest,
    Gather,
    Craft,
    Withdraw,
    Deposit,
    DepositAll,
    WithdrawGold,
    DepositGold,
    Equip,
    Unequip,
    UseItem,
    NpcBuy,
    NpcSell,
    AcceptTask,
    TradeTaskItems,
    CompleteTask,
    CancelTask,
    ExchangeTaskCoins,
    ObtainItem,
    GatherMaterials,
    ItemTask,
    MonsterTask,
    TrainSkill,
    OptimizeLoadout,
);

/// A withdrawal that soft-reserves its stock while queued and releases the
/// claim once it went through.
pub(crate) fn withdraw_job(code: &str, quantity: u32, parent: JobId) -> Job {
    Job::new(Withdraw::new(code, quantity))
        .with_parent(parent)
        .on_queued(ReserveBankItem {
            code: code.to_owned(),
            quantity,
        })
        .on_success(ReleaseReservation {
            code: code.to_owned(),
            quantity,
        })
}

/// Banks a chunk of collected ingredients and holds it for the craft that
/// withdraws it again.
pub(crate) fn stash_job(code: &str, quantity: u32, parent: JobId) -> Job {
    Job::new(Deposit::new(code, quantity))
        .with_parent(parent)
        .on_success(ReserveBankItem {
            code: code.to_owned(),
            quantity,
        })
}

/// Fails a composite job that keeps re-planning without converging.
pub(crate) fn guard_resumptions(ctx: &JobContext, what: &str) -> JobResult<()> {
    let limit = ctx.config().max_resumptions;
    if ctx.resumptions() > limit {
        return Err(JobError::generic(format!(
            "{what} did not converge after {limit} attempts"
        )));
    }
    Ok(())
}

/// A job that shares this job's parent, so a failure purges both together.
pub(crate) fn sibling_job(ctx: &JobContext, kind: impl Into<JobKind>) -> Job {
    let job = Job::new(kind);
    match ctx.parent() {
        Some(parent) => job.with_parent(parent),
        None => job,
    }
}
