//! The job record the scheduler moves between containers.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::hooks::JobHook;
use super::kinds::JobKind;

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique job identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(u64);

impl JobId {
    pub fn next() -> Self {
        Self(NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    New,
    Completed,
    Suspended,
    Failed,
}

/// One unit of character work.
///
/// `parent` is a plain id rather than a reference: it groups jobs a composite
/// spliced so they can be purged together, and it never keeps the parent
/// alive.
#[derive(Clone)]
pub struct Job {
    id: JobId,
    parent: Option<JobId>,
    status: JobStatus,
    resumptions: u32,
    kind: JobKind,
    on_queued: Option<Arc<dyn JobHook>>,
    on_success: Option<Arc<dyn JobHook>>,
}

impl Job {
    pub fn new(kind: impl Into<JobKind>) -> Self {
        Self {
            id: JobId::next(),
            parent: None,
            status: JobStatus::New,
            resumptions: 0,
            kind: kind.into(),
            on_queued: None,
            on_success: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: JobId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn on_queued(mut self, hook: impl JobHook + 'static) -> Self {
        self.on_queued = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_success(mut self, hook: impl JobHook + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn parent(&self) -> Option<JobId> {
        self.parent
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn resumptions(&self) -> u32 {
        self.resumptions
    }

    pub fn kind(&self) -> &JobKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut JobKind {
        &mut self.kind
    }

    pub fn label(&self) -> String {
        self.kind.describe()
    }

    pub(crate) fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }

    pub(crate) fn mark_resumed(&mut self) {
        self.resumptions += 1;
    }

    pub(crate) fn take_on_queued(&mut self) -> Option<Arc<dyn JobHook>> {
        self.on_queued.take()
    }

    pub(crate) fn take_on_success(&mut self) -> Option<Arc<dyn JobHook>> {
        self.on_success.take()
    }

    /// Copy with a fresh id and no progress, for running an idle template.
    pub fn fresh_clone(&self) -> Job {
        Job {
            id: JobId::next(),
            parent: self.parent,
            status: JobStatus::New,
            resumptions: 0,
            kind: self.kind.clone(),
            on_queued: self.on_queued.clone(),
            on_success: self.on_success.clone(),
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("status", &self.status)
            .field("resumptions", &self.resumptions)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Read-only view of a job for listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: JobId,
    pub parent: Option<JobId>,
    pub label: String,
    pub status: JobStatus,
    pub current: bool,
}

impl JobSummary {
    pub fn of(job: &Job) -> Self {
        Self {
            id: job.id,
            parent: job.parent,
            label: job.label(),
            status: job.status,
            current: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::kinds::{Fight, Rest};

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = JobId::next();
        let b = JobId::next();
        assert!(b > a);
    }

    #[test]
    fn clones_of_a_template_never_share_progress() {
        let template = Job::new(Fight::times("chicken", 3));

        let mut first = template.fresh_clone();
        if let JobKind::Fight(fight) = first.kind_mut() {
            fight.record_win(&[]);
        }
        first.mark_resumed();
        first.set_status(JobStatus::Suspended);

        let second = template.fresh_clone();
        assert_ne!(first.id(), second.id());
        assert_ne!(first.kind(), template.kind());
        assert_eq!(second.kind(), template.kind());
        assert_eq!(second.status(), JobStatus::New);
        assert_eq!(second.resumptions(), 0);
    }

    #[test]
    fn summaries_carry_the_label() {
        let job = Job::new(Rest);
        let summary = JobSummary::of(&job);
        assert_eq!(summary.label, "rest");
        assert!(!summary.current);
    }
}
