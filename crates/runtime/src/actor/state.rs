//! Mutable state owned by one character actor.

use game_core::Character;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::jobs::{Job, JobId, JobQueue, JobStatus, JobSummary};

use super::wish_list::WishList;

/// Where spliced jobs go relative to their anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// The job the scheduler is executing, minus the job value itself, which
/// lives inside the executing task.
///
/// Jobs spliced around it while it runs are buffered here so they land
/// immediately before or after its next resumption.
#[derive(Debug)]
pub(crate) struct CurrentJob {
    pub id: JobId,
    pub parent: Option<JobId>,
    pub label: String,
    pub idle: bool,
    pub before: Vec<Job>,
    pub after: Vec<Job>,
    /// Cleared or deleted while running; dropped instead of re-queued.
    pub discard: bool,
}

impl CurrentJob {
    pub fn new(job: &Job, idle: bool) -> Self {
        Self {
            id: job.id(),
            parent: job.parent(),
            label: job.label(),
            idle,
            before: Vec::new(),
            after: Vec::new(),
            discard: false,
        }
    }
}

pub struct ActorState {
    pub character: Character,
    pub wishes: WishList,
    pub(crate) queue: JobQueue,
    pub(crate) idle: Vec<Job>,
    pub(crate) current: Option<CurrentJob>,
    pub(crate) suspended: bool,
}

impl ActorState {
    pub fn new(character: Character) -> Self {
        Self {
            character,
            wishes: WishList::new(),
            queue: JobQueue::new(),
            idle: Vec::new(),
            current: None,
            suspended: false,
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Nothing queued, nothing running and not suspended.
    pub fn is_idle(&self) -> bool {
        !self.suspended && self.current.is_none() && self.queue.is_empty()
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn enqueue(&mut self, jobs: Vec<Job>, priority: bool) {
        if priority {
            self.queue.push_front_all(jobs);
        } else {
            for job in jobs {
                self.queue.push_back(job);
            }
        }
    }

    /// Splices `jobs` next to `anchor`, which may be the running job, a job
    /// buffered around it, or a queued job. Unknown anchors append.
    pub(crate) fn insert_relative(
        &mut self,
        anchor: JobId,
        jobs: Vec<Job>,
        placement: Placement,
    ) -> bool {
        if let Some(current) = self.current.as_mut() {
            if current.id == anchor {
                match placement {
                    Placement::Before => current.before.extend(jobs),
                    Placement::After => current.after.splice(0..0, jobs).for_each(drop),
                }
                return true;
            }
            for buffer in [&mut current.before, &mut current.after] {
                if let Some(index) = buffer.iter().position(|job| job.id() == anchor) {
                    let at = match placement {
                        Placement::Before => index,
                        Placement::After => index + 1,
                    };
                    buffer.splice(at..at, jobs).for_each(drop);
                    return true;
                }
            }
        }
        match placement {
            Placement::Before => self.queue.insert_before(anchor, jobs),
            Placement::After => self.queue.insert_after(anchor, jobs),
        }
    }

    /// Whether jobs parented by `parent` are still waiting to run.
    pub(crate) fn has_pending_children(&self, parent: JobId) -> bool {
        let buffered = self.current.as_ref().is_some_and(|current| {
            current
                .before
                .iter()
                .chain(current.after.iter())
                .any(|job| job.parent() == Some(parent))
        });
        buffered || self.queue.has_children_of(parent)
    }

    /// Drops every queued job and marks the running one for discard.
    pub(crate) fn clear_jobs(&mut self) -> Vec<JobId> {
        let mut cleared = Vec::new();
        if let Some(current) = self.current.as_mut() {
            current.discard = true;
            cleared.push(current.id);
            cleared.extend(current.before.drain(..).map(|job| job.id()));
            cleared.extend(current.after.drain(..).map(|job| job.id()));
        }
        cleared.extend(self.queue.clear());
        cleared
    }

    pub(crate) fn clear_idle_jobs(&mut self) -> usize {
        let count = self.idle.len();
        self.idle.clear();
        count
    }

    /// Removes one job wherever it is. Returns true if it was the running
    /// job, which the caller then interrupts.
    pub(crate) fn delete_job(&mut self, id: JobId) -> Option<bool> {
        if let Some(current) = self.current.as_mut() {
            if current.id == id {
                current.discard = true;
                return Some(true);
            }
            for buffer in [&mut current.before, &mut current.after] {
                if let Some(index) = buffer.iter().position(|job| job.id() == id) {
                    buffer.remove(index);
                    return Some(false);
                }
            }
        }
        if self.queue.remove(id).is_some() {
            return Some(false);
        }
        let idle_before = self.idle.len();
        self.idle.retain(|job| job.id() != id);
        (self.idle.len() < idle_before).then_some(false)
    }

    /// Picks the next job: the queue head, else a fresh clone of a random
    /// idle template. Marks it current.
    pub(crate) fn begin_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Job> {
        if self.suspended || self.current.is_some() {
            return None;
        }
        let (mut job, idle) = match self.queue.pop_front() {
            Some(job) => (job, false),
            None => (self.idle.choose(rng)?.fresh_clone(), true),
        };
        job.set_status(JobStatus::New);
        self.current = Some(CurrentJob::new(&job, idle));
        Some(job)
    }

    /// Whether the running job was cleared or deleted.
    pub(crate) fn current_discarded(&self) -> bool {
        self.current.as_ref().is_some_and(|current| current.discard)
    }

    /// Clears the current job and puts buffered work back at the head of the
    /// queue, with `requeue` (a suspended job) between the buffers and
    /// `follow_ups` (success hooks) right after its slot. A discarded job
    /// takes neither back.
    pub(crate) fn finish_current(
        &mut self,
        requeue: Option<Job>,
        follow_ups: Vec<Job>,
    ) -> Option<CurrentJob> {
        let mut current = self.current.take()?;
        let mut front = std::mem::take(&mut current.before);
        if !current.discard {
            front.extend(requeue);
            front.extend(follow_ups);
        }
        front.append(&mut current.after);
        self.queue.push_front_all(front);
        Some(current)
    }

    /// Drops queued jobs related to a failed one: its siblings, its parent,
    /// its own children, and every descendant of those.
    pub(crate) fn purge_related(&mut self, failed: JobId, parent: Option<JobId>) -> Vec<JobId> {
        let mut seeds = vec![failed];
        seeds.extend(parent);
        self.queue.purge_family(&seeds)
    }

    pub fn summaries(&self) -> Vec<JobSummary> {
        let mut listing = Vec::with_capacity(self.queue.len() + 1);
        if let Some(current) = &self.current {
            listing.extend(current.before.iter().map(JobSummary::of));
            listing.push(JobSummary {
                id: current.id,
                parent: current.parent,
                label: current.label.clone(),
                status: JobStatus::New,
                current: true,
            });
            listing.extend(current.after.iter().map(JobSummary::of));
        }
        listing.extend(self.queue.iter().map(JobSummary::of));
        listing
    }

    pub fn idle_summaries(&self) -> Vec<JobSummary> {
        self.idle.iter().map(JobSummary::of).collect()
    }
}
