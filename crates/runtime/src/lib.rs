//! Runtime for the automation bot.
//!
//! This crate turns the deterministic oracles of `game-core` into a running
//! bot: every character gets an actor with its own job queue and scheduler,
//! composite jobs plan recursively against the catalog and the shared bank,
//! and a decision policy keeps idle characters busy. Consumers build a
//! [`Runtime`] and steer characters through [`CharacterHandle`]s.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`actor`] owns per-character state and the scheduler loop
//! - [`jobs`] defines the job model, the planner and every job variant
//! - [`policy`] decides what idle characters do next
//! - [`bank`] caches the shared bank and its reservation ledger
//! - [`remote`] abstracts the game server and navigation
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] holds the shared world state
//! - [`workers`] keeps background tasks internal to the crate
pub mod actor;
pub mod api;
pub mod bank;
pub mod config;
pub mod events;
pub mod jobs;
pub mod oracle;
pub mod policy;
pub mod remote;
pub mod runtime;
pub mod services;

mod workers;

pub use actor::{CharacterActor, Placement, Scheduler, TickReport};
pub use api::{CharacterHandle, Result, RuntimeError};
pub use bank::BankCache;
pub use config::{CharacterConfig, IdleJobSpec, RuntimeConfig, SkillGoal};
pub use events::{CharacterEvent, Event, EventBus, JobEvent, Topic};
pub use jobs::{Job, JobError, JobId, JobKind, JobStatus, JobSummary};
pub use oracle::WorldState;
pub use policy::{Decision, DecisionPolicy, DefaultPolicy, PolicyView};
pub use remote::{
    ActionResponse, ClientError, DirectNavigator, GameClient, Navigator, OfflineClient,
    RemoteAction,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use services::Services;
