//! High-level runtime orchestrator.
//!
//! The runtime loads every configured character from the game client,
//! spawns one scheduler loop per character plus the policy and reservation
//! cleanup workers, and stops them all together on shutdown.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::actor::{CharacterActor, Scheduler};
use crate::api::{CharacterHandle, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{Event, Topic};
use crate::jobs::Job;
use crate::oracle::WorldState;
use crate::policy::{DecisionPolicy, DefaultPolicy};
use crate::remote::{DirectNavigator, GameClient, Navigator};
use crate::services::Services;
use crate::workers::{PolicyWorker, ReservationCleanup};

/// Running bot: one actor per character plus background workers.
///
/// [`CharacterHandle`]s are cloneable and stay valid until shutdown.
pub struct Runtime {
    services: Arc<Services>,
    characters: Vec<CharacterHandle>,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn characters(&self) -> &[CharacterHandle] {
        &self.characters
    }

    pub fn character(&self, name: &str) -> Option<CharacterHandle> {
        self.characters
            .iter()
            .find(|handle| handle.name() == name)
            .cloned()
    }

    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }

    pub fn world(&self) -> &WorldState {
        &self.services.world
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.services.events.subscribe(topic)
    }

    /// Signals every loop to stop and waits for them. Characters are
    /// suspended so no new job starts, and running jobs are interrupted at
    /// their next safe point.
    pub async fn shutdown(self) -> Result<()> {
        info!(target: "runtime::scheduler", "runtime shutting down");
        let _ = self.shutdown.send(true);
        for handle in &self.characters {
            handle.suspend();
        }

        let mut first_error = None;
        for task in self.tasks {
            if let Err(error) = task.await {
                warn!(target: "runtime::scheduler", %error, "worker ended abnormally");
                first_error.get_or_insert(RuntimeError::WorkerJoin(error));
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    world: Option<WorldState>,
    client: Option<Arc<dyn GameClient>>,
    navigator: Option<Arc<dyn Navigator>>,
    policy: Option<Arc<dyn DecisionPolicy>>,
    seed: Option<u64>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: None,
            client: None,
            navigator: None,
            policy: None,
            seed: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared world state. Required.
    pub fn world(mut self, world: WorldState) -> Self {
        self.world = Some(world);
        self
    }

    /// Remote game client. Required.
    pub fn client(mut self, client: Arc<dyn GameClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Defaults to [`DirectNavigator`].
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Defaults to [`DefaultPolicy`]. Ignored when the policy is disabled in
    /// the configuration.
    pub fn policy(mut self, policy: Arc<dyn DecisionPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Seeds the idle-job choice of every scheduler, for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub async fn build(self) -> Result<Runtime> {
        let world = self.world.ok_or(RuntimeError::MissingWorld)?;
        let client = self.client.ok_or(RuntimeError::MissingClient)?;
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(DirectNavigator));
        let settings = self.config.characters.clone();
        if settings.is_empty() {
            return Err(RuntimeError::NoCharacters);
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = settings.iter().find(|entry| !seen.insert(entry.name.as_str())) {
            return Err(RuntimeError::DuplicateCharacter(duplicate.name.clone()));
        }

        let enable_policy = self.config.enable_policy;
        let cleanup_every = self.config.reservation_cleanup_interval();
        let services = Arc::new(Services::new(world, client, navigator, self.config));

        let contents = services
            .client
            .bank_items()
            .await
            .map_err(RuntimeError::Bank)?;
        services.bank.refresh(contents);

        let (shutdown, shutdown_rx) = watch::channel(false);
        let mut actors = Vec::with_capacity(settings.len());
        let mut tasks = Vec::new();
        for (index, entry) in settings.iter().enumerate() {
            let character = services
                .client
                .character(&entry.name)
                .await
                .map_err(|source| RuntimeError::Character {
                    character: entry.name.clone(),
                    source,
                })?;
            let actor = CharacterActor::new(character, Arc::clone(&services));
            for spec in &entry.idle_jobs {
                actor.add_idle_job(Job::new(spec.to_job_kind()));
            }

            let scheduler = match self.seed {
                Some(seed) => Scheduler::with_seed(Arc::clone(&actor), seed + index as u64),
                None => Scheduler::new(Arc::clone(&actor)),
            };
            tasks.push(tokio::spawn(scheduler.run(shutdown_rx.clone())));
            info!(
                target: "runtime::scheduler",
                character = %entry.name,
                idle_jobs = entry.idle_jobs.len(),
                "character loop started"
            );
            actors.push(actor);
        }

        if enable_policy {
            let policy = self.policy.unwrap_or_else(|| Arc::new(DefaultPolicy));
            let worker = PolicyWorker::new(actors.clone(), policy, Arc::clone(&services));
            tasks.push(tokio::spawn(worker.run(shutdown_rx.clone())));
        }
        let cleanup = ReservationCleanup::new(Arc::clone(&services.bank), cleanup_every);
        tasks.push(tokio::spawn(cleanup.run(shutdown_rx)));

        Ok(Runtime {
            services,
            characters: actors.into_iter().map(CharacterHandle::new).collect(),
            shutdown,
            tasks,
        })
    }
}
