//! What a running job can see and do.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use game_core::{Character, EquipmentOptimizer, GameData};

use crate::actor::{CharacterActor, Placement};
use crate::bank::BankCache;
use crate::config::RuntimeConfig;
use crate::oracle::WorldState;
use crate::remote::{ActionResponse, ClientError, Destination, RemoteAction};

use super::error::{JobError, JobResult};
use super::job::{Job, JobId};
use super::kinds::JobKind;

/// Delay before retrying a call the server rejected as already in progress.
const BUSY_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Execution context handed to [`Execute`](super::Execute) implementations.
///
/// Every remote action goes through [`JobContext::act`], which waits out the
/// character's cooldown and observes the interrupt token before and after
/// the call.
#[derive(Clone)]
pub struct JobContext {
    actor: Arc<CharacterActor>,
    job: JobId,
    parent: Option<JobId>,
    resumptions: u32,
}

impl JobContext {
    pub fn new(actor: Arc<CharacterActor>, job: &Job) -> Self {
        Self {
            actor,
            job: job.id(),
            parent: job.parent(),
            resumptions: job.resumptions(),
        }
    }

    pub fn name(&self) -> &str {
        self.actor.name()
    }

    pub fn job_id(&self) -> JobId {
        self.job
    }

    pub fn parent(&self) -> Option<JobId> {
        self.parent
    }

    /// How many times this job has suspended before the current run.
    pub fn resumptions(&self) -> u32 {
        self.resumptions
    }

    pub fn character(&self) -> Character {
        self.actor.snapshot()
    }

    pub fn world(&self) -> &WorldState {
        &self.actor.services().world
    }

    pub fn data(&self) -> &GameData {
        self.actor.services().world.data()
    }

    pub fn bank(&self) -> &BankCache {
        &self.actor.services().bank
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.actor.services().config
    }

    pub fn optimizer(&self) -> &EquipmentOptimizer {
        &self.actor.services().optimizer
    }

    pub fn check_interrupt(&self) -> JobResult<()> {
        if self.actor.interrupt_token().is_interrupted() {
            Err(JobError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Sleeps for `duration` unless interrupted first.
    pub async fn pause(&self, duration: Duration) -> JobResult<()> {
        if duration.is_zero() {
            return self.check_interrupt();
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = self.actor.interrupt_token().interrupted() => Err(JobError::Interrupted),
        }
    }

    async fn wait_cooldown(&self) -> JobResult<()> {
        let remaining = self.actor.lock().character.cooldown_remaining(Utc::now());
        if !remaining.is_zero() {
            tracing::trace!(
                target: "runtime::job",
                character = self.name(),
                wait_ms = remaining.as_millis() as u64,
                "waiting out cooldown"
            );
        }
        self.pause(remaining).await
    }

    /// Performs one remote action for this character.
    ///
    /// Recoverable rejections (on cooldown, already in progress) are retried
    /// after waiting, up to the configured number of times.
    pub async fn act(&self, action: RemoteAction) -> JobResult<ActionResponse> {
        let services = self.actor.services();
        let mut retries = 0;
        loop {
            self.check_interrupt()?;
            self.wait_cooldown().await?;

            match services.client.perform(self.name(), &action).await {
                Ok(response) => {
                    self.actor.apply_response(&action, &response);
                    tracing::debug!(
                        target: "runtime::job",
                        character = self.name(),
                        job_id = %self.job,
                        action = action.name(),
                        cooldown_ms = response.cooldown.as_millis() as u64,
                        "action done"
                    );
                    self.check_interrupt()?;
                    return Ok(response);
                }
                Err(error)
                    if error.kind().is_recoverable()
                        && retries < services.config.max_remote_retries =>
                {
                    retries += 1;
                    let wait = match &error {
                        ClientError::OnCooldown(remaining) => *remaining,
                        _ => BUSY_RETRY_DELAY,
                    };
                    tracing::warn!(
                        target: "runtime::job",
                        character = self.name(),
                        action = action.name(),
                        retries,
                        error = %error,
                        "retrying after recoverable error"
                    );
                    self.pause(wait).await?;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    pub async fn navigate(&self, destination: Destination) -> JobResult<()> {
        let navigator = Arc::clone(&self.actor.services().navigator);
        navigator.navigate_to(self, &destination).await?;
        Ok(())
    }

    /// Queues `kinds` as children of this job to run before its next
    /// resumption.
    pub fn splice_children(&self, kinds: Vec<JobKind>) -> Vec<JobId> {
        let jobs = kinds
            .into_iter()
            .map(|kind| Job::new(kind).with_parent(self.job))
            .collect();
        self.splice_jobs(jobs, Placement::Before)
    }

    /// Queues prepared jobs next to this one.
    pub fn splice_jobs(&self, jobs: Vec<Job>, placement: Placement) -> Vec<JobId> {
        match placement {
            Placement::Before => self.actor.enqueue_before(self.job, jobs),
            Placement::After => self.actor.enqueue_after(self.job, jobs),
        }
    }

    /// Whether children this job spliced are still waiting to run.
    pub fn children_pending(&self) -> bool {
        self.actor.lock().has_pending_children(self.job)
    }

    pub fn wish(&self, code: &str, amount: u32) {
        self.actor.lock().wishes.wish(code, amount, Utc::now());
    }

    pub fn fulfil(&self, code: &str, amount: u32) -> u32 {
        self.actor.lock().wishes.fulfil(code, amount)
    }
}
