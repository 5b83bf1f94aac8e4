//! The per-character job loop.
//!
//! One [`Scheduler::tick`] runs at most one job to completion, suspension or
//! failure and applies the recovery policy:
//!
//! - completed: the `on_success` hook runs once and its follow-ups are
//!   queued right after the job's slot, unless the job was cleared or
//!   deleted while running
//! - suspended: the job goes back to the head of the queue, behind the
//!   prerequisites it spliced and ahead of anything spliced after it
//! - interrupted: like suspended, without counting a resumption; jobs
//!   cleared or deleted while running are dropped instead
//! - failed: related queued jobs are purged and the character is
//!   resynchronised from the remote source of truth
//!
//! Each job executes on its own tokio task so a panic is contained and
//! reported as a generic failure.
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;

use crate::events::JobEvent;
use crate::jobs::{HookContext, Job, JobContext, JobError, JobId, JobStatus, Outcome};

use super::CharacterActor;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickReport {
    /// Suspended, or a job is already running.
    Skipped,
    /// Nothing queued and no idle job to fall back to.
    Idle,
    Ran {
        id: JobId,
        label: String,
        status: JobStatus,
    },
}

impl TickReport {
    pub fn status(&self) -> Option<JobStatus> {
        match self {
            Self::Ran { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// How the job task ended.
enum Finished {
    Completed(Job),
    Suspended(Job),
    Interrupted(Job),
    Failed(JobError),
}

pub struct Scheduler {
    actor: Arc<CharacterActor>,
    rng: StdRng,
}

impl Scheduler {
    pub fn new(actor: Arc<CharacterActor>) -> Self {
        Self {
            actor,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic idle-job picks.
    pub fn with_seed(actor: Arc<CharacterActor>, seed: u64) -> Self {
        Self {
            actor,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn actor(&self) -> &Arc<CharacterActor> {
        &self.actor
    }

    pub async fn tick(&mut self) -> TickReport {
        let (job, idle) = {
            let mut state = self.actor.lock();
            if state.is_suspended() || state.is_busy() {
                return TickReport::Skipped;
            }
            // Interrupts are only raised under this lock, so nothing can
            // target the new job before the reset.
            self.actor.interrupt_token().reset();
            let Some(job) = state.begin_next(&mut self.rng) else {
                return TickReport::Idle;
            };
            let idle = state.current.as_ref().is_some_and(|current| current.idle);
            (job, idle)
        };

        let id = job.id();
        let parent = job.parent();
        let label = job.label();
        let name = self.actor.name().to_owned();
        tracing::info!(
            target: "runtime::scheduler",
            character = %name,
            job_id = %id,
            job = %label,
            idle,
            resumptions = job.resumptions(),
            "job started"
        );
        self.actor.services().events.publish(JobEvent::Started {
            character: name.clone(),
            job_id: id,
            job: label.clone(),
            idle,
        });

        let finished = self.execute(job).await;
        let status = match finished {
            Finished::Completed(job) => self.complete(job, &label),
            Finished::Suspended(mut job) => {
                job.mark_resumed();
                self.requeue(job, &label, false)
            }
            Finished::Interrupted(job) => self.requeue(job, &label, true),
            Finished::Failed(error) => self.fail(id, parent, &label, error).await,
        };
        TickReport::Ran { id, label, status }
    }

    async fn execute(&self, mut job: Job) -> Finished {
        let ctx = JobContext::new(Arc::clone(&self.actor), &job);
        let task = tokio::spawn(async move {
            let result = job.kind_mut().execute(&ctx).await;
            (job, result)
        });
        match task.await {
            Ok((job, Ok(Outcome::Completed))) => Finished::Completed(job),
            Ok((job, Ok(Outcome::Suspended))) => Finished::Suspended(job),
            Ok((job, Err(JobError::Interrupted))) => Finished::Interrupted(job),
            Ok((_, Err(error))) => Finished::Failed(error),
            Err(error) => {
                tracing::error!(
                    target: "runtime::scheduler",
                    character = self.actor.name(),
                    panicked = error.is_panic(),
                    "job task aborted"
                );
                let reason = if error.is_panic() { "job panicked" } else { "job task was cancelled" };
                Finished::Failed(JobError::generic(reason))
            }
        }
    }

    fn complete(&self, mut job: Job, label: &str) -> JobStatus {
        job.set_status(JobStatus::Completed);
        // Cleared or deleted while running: no hook, no follow-ups.
        let discarded = self.actor.lock().current_discarded();
        let mut follow_ups = Vec::new();
        if discarded {
            tracing::debug!(
                target: "runtime::scheduler",
                character = self.actor.name(),
                job_id = %job.id(),
                "discarded job completed; success hook skipped"
            );
        } else if let Some(hook) = job.take_on_success() {
            let services = self.actor.services();
            let mut ctx = HookContext::new(self.actor.name(), &services.bank, job.id());
            hook.run(&mut ctx);
            tracing::debug!(
                target: "runtime::scheduler",
                character = self.actor.name(),
                job_id = %job.id(),
                hook = hook.name(),
                follow_ups = ctx.follow_ups.len(),
                "success hook ran"
            );
            follow_ups = ctx.follow_ups;
        }
        let follow_ups = self.actor.prepare(follow_ups);
        self.actor.lock().finish_current(None, follow_ups);

        tracing::info!(
            target: "runtime::scheduler",
            character = self.actor.name(),
            job_id = %job.id(),
            job = label,
            "job completed"
        );
        self.actor.services().events.publish(JobEvent::Completed {
            character: self.actor.name().to_owned(),
            job_id: job.id(),
            job: label.to_owned(),
        });
        JobStatus::Completed
    }

    fn requeue(&self, mut job: Job, label: &str, interrupted: bool) -> JobStatus {
        job.set_status(JobStatus::Suspended);
        let id = job.id();
        let discarded = self
            .actor
            .lock()
            .finish_current(Some(job), Vec::new())
            .is_some_and(|current| current.discard);

        tracing::debug!(
            target: "runtime::scheduler",
            character = self.actor.name(),
            job_id = %id,
            job = label,
            interrupted,
            discarded,
            "job suspended"
        );
        self.actor.services().events.publish(JobEvent::Suspended {
            character: self.actor.name().to_owned(),
            job_id: id,
            job: label.to_owned(),
        });
        self.actor.wake().notify_one();
        JobStatus::Suspended
    }

    async fn fail(
        &self,
        id: JobId,
        parent: Option<JobId>,
        label: &str,
        error: JobError,
    ) -> JobStatus {
        let purged = {
            let mut state = self.actor.lock();
            state.finish_current(None, Vec::new());
            state.purge_related(id, parent)
        };
        tracing::warn!(
            target: "runtime::scheduler",
            character = self.actor.name(),
            job_id = %id,
            job = label,
            kind = %error.kind(),
            error = %error,
            purged = purged.len(),
            "job failed"
        );
        self.actor.publish_purged(purged);

        if let Err(resync) = self.actor.resync().await {
            tracing::warn!(
                target: "runtime::scheduler",
                character = self.actor.name(),
                error = %resync,
                "resync after failure failed"
            );
        }

        let message = match &error {
            JobError::Failed { message, .. } => message.clone(),
            JobError::Interrupted => error.to_string(),
        };
        self.actor.services().events.publish(JobEvent::Failed {
            character: self.actor.name().to_owned(),
            job_id: id,
            job: label.to_owned(),
            kind: error.kind(),
            message,
        });
        JobStatus::Failed
    }

    /// Ticks until `shutdown` flips to true, sleeping on the wake
    /// notification or the idle poll interval between empty ticks.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let poll = self.actor.services().config.idle_poll();
        tracing::info!(target: "runtime::scheduler", character = self.actor.name(), "scheduler started");
        loop {
            if *shutdown.borrow() {
                break;
            }
            let report = self.tick().await;
            if matches!(report, TickReport::Ran { .. }) {
                continue;
            }
            tokio::select! {
                _ = self.actor.wake().notified() => {}
                _ = tokio::time::sleep(poll) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::info!(target: "runtime::scheduler", character = self.actor.name(), "scheduler stopped");
    }
}
