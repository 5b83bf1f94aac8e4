//! Character actors.
//!
//! A [`CharacterActor`] owns one character's snapshot and job containers and
//! is the only writer of that state. Its [`Scheduler`] runs one job at a time;
//! many actors run concurrently as independent tasks.
mod interrupt;
mod scheduler;
mod state;
mod wish_list;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use game_core::Character;
use tokio::sync::Notify;

pub use interrupt::InterruptToken;
pub use scheduler::{Scheduler, TickReport};
pub use state::{ActorState, Placement};
pub use wish_list::{Wish, WishList};

use crate::events::{CharacterEvent, JobEvent};
use crate::jobs::{HookContext, Job, JobId, JobSummary};
use crate::remote::{ActionResponse, ClientError, RemoteAction};
use crate::services::Services;

pub struct CharacterActor {
    name: String,
    state: Mutex<ActorState>,
    interrupt: InterruptToken,
    wake: Notify,
    services: Arc<Services>,
}

impl CharacterActor {
    pub fn new(character: Character, services: Arc<Services>) -> Arc<Self> {
        Arc::new(Self {
            name: character.name.clone(),
            state: Mutex::new(ActorState::new(character)),
            interrupt: InterruptToken::new(),
            wake: Notify::new(),
            services,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }

    pub fn interrupt_token(&self) -> &InterruptToken {
        &self.interrupt
    }

    pub(crate) fn wake(&self) -> &Notify {
        &self.wake
    }

    /// Locks the actor state. Never hold the guard across an await.
    pub fn lock(&self) -> MutexGuard<'_, ActorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Character {
        self.lock().character.clone()
    }

    /// Runs `on_queued` hooks and announces the jobs. Hook follow-ups are
    /// placed ahead of the job that produced them.
    pub(crate) fn prepare(&self, jobs: Vec<Job>) -> Vec<Job> {
        let mut prepared = Vec::with_capacity(jobs.len());
        for mut job in jobs {
            if let Some(hook) = job.take_on_queued() {
                let mut ctx = HookContext::new(&self.name, &self.services.bank, job.id());
                hook.run(&mut ctx);
                prepared.append(&mut ctx.follow_ups);
            }
            prepared.push(job);
        }
        for job in &prepared {
            tracing::debug!(
                target: "runtime::job",
                character = %self.name,
                job_id = %job.id(),
                job = %job.label(),
                "job queued"
            );
            self.services.events.publish(JobEvent::Queued {
                character: self.name.clone(),
                job_id: job.id(),
                job: job.label(),
            });
        }
        prepared
    }

    /// Queues a job at the tail, or at the head when `priority` is set.
    pub fn enqueue(&self, job: Job, priority: bool) -> JobId {
        let id = job.id();
        self.enqueue_all(vec![job], priority);
        id
    }

    pub fn enqueue_all(&self, jobs: Vec<Job>, priority: bool) -> Vec<JobId> {
        let ids = jobs.iter().map(Job::id).collect();
        let jobs = self.prepare(jobs);
        self.lock().enqueue(jobs, priority);
        self.wake.notify_one();
        ids
    }

    pub fn enqueue_before(&self, anchor: JobId, jobs: Vec<Job>) -> Vec<JobId> {
        self.splice(anchor, jobs, Placement::Before)
    }

    pub fn enqueue_after(&self, anchor: JobId, jobs: Vec<Job>) -> Vec<JobId> {
        self.splice(anchor, jobs, Placement::After)
    }

    fn splice(&self, anchor: JobId, jobs: Vec<Job>, placement: Placement) -> Vec<JobId> {
        let ids = jobs.iter().map(Job::id).collect();
        let jobs = self.prepare(jobs);
        let found = self.lock().insert_relative(anchor, jobs, placement);
        if !found {
            tracing::warn!(
                target: "runtime::job",
                character = %self.name,
                anchor = %anchor,
                "anchor not found; appended instead"
            );
        }
        self.wake.notify_one();
        ids
    }

    pub fn add_idle_job(&self, job: Job) -> JobId {
        let id = job.id();
        self.lock().idle.push(job);
        self.wake.notify_one();
        id
    }

    /// Discards every queued job and interrupts the running one.
    ///
    /// Interrupts are raised under the state lock so they cannot land
    /// between a job being marked current and its token being reset.
    pub fn clear_jobs(&self) -> Vec<JobId> {
        let cleared = {
            let mut state = self.lock();
            if state.is_busy() {
                self.interrupt.interrupt();
            }
            state.clear_jobs()
        };
        self.publish_purged(cleared.clone());
        cleared
    }

    pub fn clear_idle_jobs(&self) -> usize {
        self.lock().clear_idle_jobs()
    }

    /// Removes a queued, buffered, idle or running job. Returns whether it
    /// existed.
    pub fn delete_job(&self, id: JobId) -> bool {
        let deleted = {
            let mut state = self.lock();
            let deleted = state.delete_job(id);
            if deleted == Some(true) {
                self.interrupt.interrupt();
            }
            deleted
        };
        if deleted.is_none() {
            return false;
        }
        self.publish_purged(vec![id]);
        true
    }

    /// Interrupts the running job, if any.
    pub fn interrupt(&self) {
        let state = self.lock();
        if state.is_busy() {
            self.interrupt.interrupt();
        }
    }

    /// Stops starting new jobs and interrupts the running one.
    pub fn suspend(&self) {
        let mut state = self.lock();
        state.suspended = true;
        if state.is_busy() {
            self.interrupt.interrupt();
        }
    }

    pub fn resume(&self) {
        self.lock().suspended = false;
        self.wake.notify_one();
    }

    pub fn jobs(&self) -> Vec<JobSummary> {
        self.lock().summaries()
    }

    pub fn idle_jobs(&self) -> Vec<JobSummary> {
        self.lock().idle_summaries()
    }

    /// Writes the snapshot a remote action returned.
    pub(crate) fn apply_response(&self, action: &RemoteAction, response: &ActionResponse) {
        let (position, hp) = (response.character.position, response.character.hp);
        self.lock().character = response.character.clone();
        self.services.events.publish(CharacterEvent::Updated {
            character: self.name.clone(),
            action: action.name().to_owned(),
            position,
            hp,
        });
    }

    /// Reloads the snapshot from the remote source of truth.
    pub async fn resync(&self) -> Result<(), ClientError> {
        let character = self.services.client.character(&self.name).await?;
        self.lock().character = character;
        tracing::info!(target: "runtime::scheduler", character = %self.name, "character resynced");
        self.services.events.publish(CharacterEvent::Resynced {
            character: self.name.clone(),
        });
        Ok(())
    }

    pub(crate) fn publish_purged(&self, job_ids: Vec<JobId>) {
        if job_ids.is_empty() {
            return;
        }
        self.services.events.publish(JobEvent::Purged {
            character: self.name.clone(),
            job_ids,
        });
    }
}
