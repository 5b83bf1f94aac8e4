//! Decision policy worker.
//!
//! Every policy interval this worker drops expired world events and stale
//! wishes, then asks the [`DecisionPolicy`] what each idle character should
//! do and queues the answer.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::actor::CharacterActor;
use crate::jobs::Job;
use crate::policy::{DecisionPolicy, PolicyView};
use crate::services::Services;

pub struct PolicyWorker {
    actors: Vec<Arc<CharacterActor>>,
    policy: Arc<dyn DecisionPolicy>,
    services: Arc<Services>,
}

impl PolicyWorker {
    pub fn new(
        actors: Vec<Arc<CharacterActor>>,
        policy: Arc<dyn DecisionPolicy>,
        services: Arc<Services>,
    ) -> Self {
        Self {
            actors,
            policy,
            services,
        }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            target: "runtime::policy",
            characters = self.actors.len(),
            "policy worker started"
        );
        let mut interval = time::interval(self.services.config.policy_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.cycle();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!(target: "runtime::policy", "policy worker stopped");
    }

    /// One pass over every character.
    pub fn cycle(&self) -> usize {
        let now = Utc::now();
        let pruned = self.services.world.prune_events(now);
        if pruned > 0 {
            debug!(target: "runtime::policy", pruned, "expired world events dropped");
        }

        let max_age = self.services.config.wish_max_age();
        let mut queued = 0;
        for actor in &self.actors {
            let (character, wishes) = {
                let mut state = actor.lock();
                state.wishes.cleanup(max_age, now);
                if !state.is_idle() {
                    continue;
                }
                (state.character.clone(), state.wishes.clone())
            };

            let config = self.services.config.as_ref();
            let view = PolicyView {
                character: &character,
                settings: config.character(actor.name()),
                wishes: &wishes,
                world: &self.services.world,
                optimizer: &self.services.optimizer,
                config,
                now,
            };
            let Some(decision) = self.policy.decide(&view) else {
                continue;
            };

            info!(
                target: "runtime::policy",
                character = actor.name(),
                reason = decision.reason,
                jobs = decision.jobs.len(),
                "policy queued work"
            );
            let jobs: Vec<Job> = decision.jobs.into_iter().map(Job::new).collect();
            queued += jobs.len();
            actor.enqueue_all(jobs, false);
        }
        queued
    }
}
