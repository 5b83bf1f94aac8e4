//! Ordered job queue.
//!
//! FIFO except for head insertion and splicing around an anchor. Every
//! operation keeps the relative order of the jobs it does not touch.

use std::collections::{HashSet, VecDeque};

use super::job::{Job, JobId};

#[derive(Debug, Default)]
pub struct JobQueue {
    jobs: VecDeque<Job>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn ids(&self) -> Vec<JobId> {
        self.jobs.iter().map(Job::id).collect()
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: JobId) -> Option<usize> {
        self.jobs.iter().position(|job| job.id() == id)
    }

    pub fn push_back(&mut self, job: Job) {
        self.jobs.push_back(job);
    }

    pub fn push_front(&mut self, job: Job) {
        self.jobs.push_front(job);
    }

    /// Puts `jobs` at the head, in the order given.
    pub fn push_front_all(&mut self, jobs: Vec<Job>) {
        for job in jobs.into_iter().rev() {
            self.jobs.push_front(job);
        }
    }

    pub fn pop_front(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    /// Splices `jobs` right before `anchor`. Without the anchor they are
    /// appended; returns whether it was found.
    pub fn insert_before(&mut self, anchor: JobId, jobs: Vec<Job>) -> bool {
        match self.position(anchor) {
            Some(index) => {
                self.splice_at(index, jobs);
                true
            }
            None => {
                self.jobs.extend(jobs);
                false
            }
        }
    }

    /// Splices `jobs` right after `anchor`. Without the anchor they are
    /// appended; returns whether it was found.
    pub fn insert_after(&mut self, anchor: JobId, jobs: Vec<Job>) -> bool {
        match self.position(anchor) {
            Some(index) => {
                self.splice_at(index + 1, jobs);
                true
            }
            None => {
                self.jobs.extend(jobs);
                false
            }
        }
    }

    fn splice_at(&mut self, index: usize, jobs: Vec<Job>) {
        let tail = self.jobs.split_off(index);
        self.jobs.extend(jobs);
        self.jobs.extend(tail);
    }

    pub fn remove(&mut self, id: JobId) -> Option<Job> {
        let index = self.position(id)?;
        self.jobs.remove(index)
    }

    pub fn clear(&mut self) -> Vec<JobId> {
        self.jobs.drain(..).map(|job| job.id()).collect()
    }

    /// Whether any queued job names `parent` as its parent.
    pub fn has_children_of(&self, parent: JobId) -> bool {
        self.jobs.iter().any(|job| job.parent() == Some(parent))
    }

    /// Removes every job in `seeds`, every job whose parent is in `seeds`, and
    /// transitively every descendant of a removed job.
    pub fn purge_family(&mut self, seeds: &[JobId]) -> Vec<JobId> {
        let mut doomed: HashSet<JobId> = seeds.iter().copied().collect();
        loop {
            let before = doomed.len();
            for job in &self.jobs {
                if job.parent().is_some_and(|parent| doomed.contains(&parent)) {
                    doomed.insert(job.id());
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        let mut purged = Vec::new();
        self.jobs.retain(|job| {
            if doomed.contains(&job.id()) {
                purged.push(job.id());
                false
            } else {
                true
            }
        });
        purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::kinds::Rest;
    use proptest::prelude::*;

    fn jobs(n: usize) -> Vec<Job> {
        (0..n).map(|_| Job::new(Rest)).collect()
    }

    fn queue_of(jobs: &[Job]) -> JobQueue {
        let mut queue = JobQueue::new();
        for job in jobs {
            queue.push_back(job.clone());
        }
        queue
    }

    #[test]
    fn insert_after_anchor_keeps_the_rest_in_order() {
        let base = jobs(3);
        let extra = jobs(2);
        let mut queue = queue_of(&base);

        assert!(queue.insert_after(base[0].id(), extra.clone()));
        assert_eq!(
            queue.ids(),
            vec![
                base[0].id(),
                extra[0].id(),
                extra[1].id(),
                base[1].id(),
                base[2].id()
            ]
        );
    }

    #[test]
    fn missing_anchor_appends() {
        let base = jobs(2);
        let extra = jobs(1);
        let mut queue = queue_of(&base);

        assert!(!queue.insert_before(JobId::next(), extra.clone()));
        assert_eq!(queue.ids(), vec![base[0].id(), base[1].id(), extra[0].id()]);
    }

    #[test]
    fn purge_family_follows_descendants_only() {
        let parent = Job::new(Rest);
        let child = Job::new(Rest).with_parent(parent.id());
        let grandchild = Job::new(Rest).with_parent(child.id());
        let grandparent = Job::new(Rest);
        let parent = parent.with_parent(grandparent.id());
        let stranger = Job::new(Rest);

        let mut queue = queue_of(&[
            grandchild.clone(),
            child.clone(),
            parent.clone(),
            grandparent.clone(),
            stranger.clone(),
        ]);
        let purged = queue.purge_family(&[parent.id()]);

        assert_eq!(purged.len(), 3);
        assert_eq!(queue.ids(), vec![grandparent.id(), stranger.id()]);
    }

    proptest! {
        #[test]
        fn splicing_preserves_untouched_order(
            len in 0usize..8,
            anchor in 0usize..10,
            inserted in 0usize..4,
            before in any::<bool>(),
        ) {
            let base = jobs(len);
            let extra = jobs(inserted);
            let mut queue = queue_of(&base);
            let anchor_id = base.get(anchor).map(Job::id).unwrap_or_else(JobId::next);

            if before {
                queue.insert_before(anchor_id, extra.clone());
            } else {
                queue.insert_after(anchor_id, extra.clone());
            }

            let ids = queue.ids();
            let base_ids: Vec<JobId> = base.iter().map(Job::id).collect();
            let extra_ids: Vec<JobId> = extra.iter().map(Job::id).collect();
            let kept: Vec<JobId> = ids.iter().copied().filter(|id| base_ids.contains(id)).collect();
            let spliced: Vec<JobId> = ids.iter().copied().filter(|id| extra_ids.contains(id)).collect();

            prop_assert_eq!(kept, base_ids);
            prop_assert_eq!(&spliced, &extra_ids);
            prop_assert_eq!(ids.len(), len + inserted);

            // The spliced run is contiguous and sits against the anchor.
            if let Some(first) = extra_ids.first() {
                let start = ids.iter().position(|id| id == first).unwrap();
                prop_assert_eq!(&ids[start..start + inserted], &extra_ids[..]);
                if anchor < len {
                    if before {
                        prop_assert_eq!(ids[start + inserted], anchor_id);
                    } else {
                        prop_assert_eq!(ids[start - 1], anchor_id);
                    }
                } else {
                    prop_assert_eq!(start, len);
                }
            }
        }
    }
}
