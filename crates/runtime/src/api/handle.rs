//! Cloneable façade over one character actor.
//!
//! [`CharacterHandle`] is what operators and embedding code hold: it exposes
//! the queue contracts without the scheduler internals.
use std::sync::Arc;

use game_core::Character;
use tokio::sync::broadcast;

use crate::actor::CharacterActor;
use crate::events::{Event, Topic};
use crate::jobs::{Job, JobId, JobKind, JobSummary};
use crate::remote::ClientError;

#[derive(Clone)]
pub struct CharacterHandle {
    actor: Arc<CharacterActor>,
}

impl CharacterHandle {
    pub(crate) fn new(actor: Arc<CharacterActor>) -> Self {
        Self { actor }
    }

    pub fn name(&self) -> &str {
        self.actor.name()
    }

    /// Queues a job built from `kind` at the tail.
    pub fn enqueue(&self, kind: impl Into<JobKind>) -> JobId {
        self.actor.enqueue(Job::new(kind), false)
    }

    /// Queues a prepared job, at the head when `priority` is set.
    pub fn enqueue_job(&self, job: Job, priority: bool) -> JobId {
        self.actor.enqueue(job, priority)
    }

    pub fn enqueue_all(&self, jobs: Vec<Job>, priority: bool) -> Vec<JobId> {
        self.actor.enqueue_all(jobs, priority)
    }

    /// Places `jobs` right before `anchor`, in order.
    pub fn enqueue_before(&self, anchor: JobId, jobs: Vec<Job>) -> Vec<JobId> {
        self.actor.enqueue_before(anchor, jobs)
    }

    /// Places `jobs` right after `anchor`, in order.
    pub fn enqueue_after(&self, anchor: JobId, jobs: Vec<Job>) -> Vec<JobId> {
        self.actor.enqueue_after(anchor, jobs)
    }

    pub fn add_idle_job(&self, kind: impl Into<JobKind>) -> JobId {
        self.actor.add_idle_job(Job::new(kind))
    }

    pub fn clear_jobs(&self) -> Vec<JobId> {
        self.actor.clear_jobs()
    }

    pub fn clear_idle_jobs(&self) -> usize {
        self.actor.clear_idle_jobs()
    }

    pub fn delete_job(&self, id: JobId) -> bool {
        self.actor.delete_job(id)
    }

    pub fn interrupt(&self) {
        self.actor.interrupt();
    }

    pub fn suspend(&self) {
        self.actor.suspend();
    }

    pub fn resume(&self) {
        self.actor.resume();
    }

    pub fn is_suspended(&self) -> bool {
        self.actor.lock().is_suspended()
    }

    /// Nothing queued, nothing running and not suspended.
    pub fn is_idle(&self) -> bool {
        self.actor.lock().is_idle()
    }

    /// Jobs in execution order, the running one flagged `current`.
    pub fn jobs(&self) -> Vec<JobSummary> {
        self.actor.jobs()
    }

    pub fn idle_jobs(&self) -> Vec<JobSummary> {
        self.actor.idle_jobs()
    }

    pub fn snapshot(&self) -> Character {
        self.actor.snapshot()
    }

    /// Amount of `code` this character is still fetching.
    pub fn wished(&self, code: &str) -> u32 {
        self.actor.lock().wishes.outstanding(code)
    }

    pub async fn resync(&self) -> Result<(), ClientError> {
        self.actor.resync().await
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.actor.services().events.subscribe(topic)
    }
}
