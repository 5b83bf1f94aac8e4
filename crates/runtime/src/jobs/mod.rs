//! The job model: records, queues, hooks, the execution context and the
//! concrete job variants.
pub mod context;
pub mod error;
pub mod hooks;
pub mod job;
pub mod kinds;
pub mod planner;
pub mod queue;

pub use context::JobContext;
pub use error::{JobError, JobResult};
pub use hooks::{DepositResult, HookContext, JobHook, ReleaseReservation, ReserveBankItem};
pub use job::{Job, JobId, JobStatus, JobSummary};
pub use kinds::{Execute, JobKind, Outcome};
pub use planner::{MAX_PLAN_DEPTH, PlanOptions, PlanStep, Planner};
pub use queue::JobQueue;
