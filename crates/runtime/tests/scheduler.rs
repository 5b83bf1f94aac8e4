mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use game_core::{ErrorKind, Position};
use runtime::jobs::kinds::{Deposit, Fight, Gather, ObtainItem};
use runtime::jobs::{DepositResult, JobContext};
use runtime::remote::{Destination, NavigationError};
use runtime::{
    CharacterActor, Event, GameClient, Job, JobEvent, JobStatus, Navigator, OfflineClient,
    Scheduler, Services, TickReport, Topic,
};

fn ids(actor: &runtime::CharacterActor) -> Vec<runtime::JobId> {
    actor.jobs().into_iter().map(|summary| summary.id).collect()
}

fn copper(amount: u32) -> Job {
    Job::new(Gather::new("copper_rocks", "copper_ore", amount))
}

#[tokio::test]
async fn queued_jobs_run_in_order() {
    let world = common::world();
    let server = common::server(&world, vec![common::character("ada", 1)]);
    let actor = common::actor(&world, &server, "ada").await;

    let first = actor.enqueue(copper(2), false);
    let second = actor.enqueue(copper(1), false);
    let urgent = actor.enqueue(copper(1), true);

    let mut scheduler = Scheduler::with_seed(actor.clone(), 1);
    let ran: Vec<_> = common::drain(&mut scheduler, 10)
        .await
        .into_iter()
        .map(|report| match report {
            TickReport::Ran { id, status, .. } => (id, status),
            other => panic!("unexpected report {other:?}"),
        })
        .collect();

    assert_eq!(
        ran,
        vec![
            (urgent, JobStatus::Completed),
            (first, JobStatus::Completed),
            (second, JobStatus::Completed),
        ]
    );
    assert_eq!(actor.snapshot().inventory.quantity_of("copper_ore"), 4);
    assert_eq!(server.bank_quantity("copper_ore"), 0);
}

#[tokio::test]
async fn enqueue_after_splices_behind_the_anchor() {
    let world = common::world();
    let server = common::server(&world, vec![common::character("ada", 1)]);
    let actor = common::actor(&world, &server, "ada").await;

    let a = actor.enqueue(copper(1), false);
    let b = actor.enqueue(copper(2), false);
    let c = actor.enqueue(copper(3), false);
    let spliced = actor.enqueue_after(a, vec![copper(4), copper(5)]);

    assert_eq!(ids(&actor), vec![a, spliced[0], spliced[1], b, c]);

    let before = actor.enqueue_before(c, vec![copper(6)]);
    assert_eq!(ids(&actor), vec![a, spliced[0], spliced[1], b, before[0], c]);
}

#[tokio::test]
async fn skill_failures_purge_the_family_and_resync() {
    let world = common::world();
    let server = common::server(&world, vec![common::character("ada", 1)]);
    let actor = common::actor(&world, &server, "ada").await;
    let mut events = actor.services().events.subscribe(Topic::Job);

    let doomed = Job::new(Gather::new("iron_rocks", "iron_ore", 5));
    let doomed_id = doomed.id();
    actor.enqueue(doomed, false);
    let child = actor.enqueue(copper(1).with_parent(doomed_id), false);
    let unrelated = actor.enqueue(copper(1), false);

    // Local drift the resync must undo.
    actor.lock().character.gold = 999;

    let mut scheduler = Scheduler::with_seed(actor.clone(), 1);
    let report = scheduler.tick().await;
    assert_eq!(report.status(), Some(JobStatus::Failed));
    assert_eq!(ids(&actor), vec![unrelated]);
    assert_eq!(actor.snapshot().gold, 0);

    let mut purged = Vec::new();
    let mut failure = None;
    while let Ok(event) = events.try_recv() {
        match event {
            Event::Job(JobEvent::Purged { job_ids, .. }) => purged.extend(job_ids),
            Event::Job(JobEvent::Failed { kind, .. }) => failure = Some(kind),
            _ => {}
        }
    }
    assert_eq!(purged, vec![child]);
    assert_eq!(failure, Some(ErrorKind::InsufficientSkill));
    assert!(server.actions("ada").is_empty());
}

#[tokio::test]
async fn idle_jobs_run_as_fresh_copies() {
    let world = common::world();
    let server = common::server(&world, vec![common::character("ada", 1)]);
    let actor = common::actor(&world, &server, "ada").await;
    actor.add_idle_job(copper(1));

    let mut scheduler = Scheduler::with_seed(actor.clone(), 9);
    for _ in 0..3 {
        assert_eq!(scheduler.tick().await.status(), Some(JobStatus::Completed));
    }
    assert_eq!(actor.snapshot().inventory.quantity_of("copper_ore"), 3);
    assert!(actor.jobs().is_empty());
    assert_eq!(actor.idle_jobs().len(), 1);
}

#[tokio::test]
async fn suspended_actors_skip_ticks() {
    let world = common::world();
    let server = common::server(&world, vec![common::character("ada", 1)]);
    let actor = common::actor(&world, &server, "ada").await;
    actor.enqueue(copper(1), false);
    actor.suspend();

    let mut scheduler = Scheduler::with_seed(actor.clone(), 1);
    assert_eq!(scheduler.tick().await, TickReport::Skipped);
    actor.resume();
    assert_eq!(scheduler.tick().await.status(), Some(JobStatus::Completed));
    assert_eq!(scheduler.tick().await, TickReport::Idle);
}

/// An actor whose every action is followed by a minute-long cooldown, so
/// a multi-action job sits waiting at a safe point.
async fn slow_actor(world: &runtime::WorldState) -> (Arc<OfflineClient>, Arc<CharacterActor>) {
    let server = Arc::new(OfflineClient::new(world.clone()).with_cooldown(Duration::from_secs(60)));
    server.add_character(common::character("ada", 1));
    let actor = common::actor(world, &server, "ada").await;
    (server, actor)
}

/// Runs one tick in the background, returning the scheduler with the report.
fn spawn_tick(mut scheduler: Scheduler) -> tokio::task::JoinHandle<(Scheduler, TickReport)> {
    tokio::spawn(async move {
        let report = scheduler.tick().await;
        (scheduler, report)
    })
}

async fn first_action(server: &OfflineClient) {
    let acted = common::wait_until(|| !server.actions("ada").is_empty(), Duration::from_secs(5)).await;
    assert!(acted, "the job never acted");
}

#[tokio::test]
async fn interrupted_jobs_are_requeued_at_the_head() {
    let world = common::world();
    let (server, actor) = slow_actor(&world).await;
    let running = actor.enqueue(copper(3), false);
    let next = actor.enqueue(copper(1), false);

    let tick = spawn_tick(Scheduler::with_seed(actor.clone(), 1));
    first_action(&server).await;
    actor.interrupt();

    let (_, report) = tokio::time::timeout(Duration::from_secs(5), tick)
        .await
        .expect("interrupt honoured before the cooldown ran out")
        .expect("tick finished");
    assert_eq!(report.status(), Some(JobStatus::Suspended));

    let jobs = actor.jobs();
    assert_eq!(ids(&actor), vec![running, next]);
    assert_eq!(jobs[0].status, JobStatus::Suspended);
    assert!(!jobs[0].current);
    assert!(!server.actions("ada").contains(&"gather"));
}

#[tokio::test]
async fn clearing_drops_the_running_job() {
    let world = common::world();
    let (server, actor) = slow_actor(&world).await;
    let running = actor.enqueue(copper(3), false);
    let queued = actor.enqueue(copper(1), false);

    let tick = spawn_tick(Scheduler::with_seed(actor.clone(), 1));
    first_action(&server).await;
    assert_eq!(actor.clear_jobs(), vec![running, queued]);

    let (mut scheduler, report) = tokio::time::timeout(Duration::from_secs(5), tick)
        .await
        .expect("clear interrupts the job")
        .expect("tick finished");
    assert!(matches!(report, TickReport::Ran { id, .. } if id == running));
    assert!(actor.jobs().is_empty());
    assert!(!actor.lock().is_busy());
    assert_eq!(scheduler.tick().await, TickReport::Idle);
}

#[tokio::test]
async fn deleting_the_running_job_keeps_the_rest() {
    let world = common::world();
    let (server, actor) = slow_actor(&world).await;
    let running = actor.enqueue(copper(3), false);
    let queued = actor.enqueue(copper(1), false);

    let tick = spawn_tick(Scheduler::with_seed(actor.clone(), 1));
    first_action(&server).await;
    assert!(actor.delete_job(running));

    tokio::time::timeout(Duration::from_secs(5), tick)
        .await
        .expect("delete interrupts the job")
        .expect("tick finished");
    assert_eq!(ids(&actor), vec![queued]);
    assert!(!actor.lock().is_busy());
}

/// Blows up on first use.
struct PanickingNavigator;

#[async_trait]
impl Navigator for PanickingNavigator {
    async fn navigate_to(
        &self,
        _ctx: &JobContext,
        destination: &Destination,
    ) -> Result<Position, NavigationError> {
        panic!("no route to {destination}");
    }
}

#[tokio::test]
async fn panicking_jobs_fail_without_killing_the_loop() {
    let world = common::world();
    let server = common::server(&world, vec![common::character("ada", 1)]);
    let client: Arc<dyn GameClient> = server.clone();
    let services = Arc::new(Services::new(
        world.clone(),
        client,
        Arc::new(PanickingNavigator),
        common::config(&["ada"]),
    ));
    let character = services.client.character("ada").await.expect("character loads");
    let actor = CharacterActor::new(character, services);
    let mut events = actor.services().events.subscribe(Topic::Job);

    let doomed = copper(1);
    let doomed_id = doomed.id();
    actor.enqueue(doomed, false);
    let child = actor.enqueue(copper(1).with_parent(doomed_id), false);
    // Nothing held, so it completes without moving.
    let survivor = actor.enqueue(Job::new(Deposit::all_of("copper_ore")), false);

    let mut scheduler = Scheduler::with_seed(actor.clone(), 1);
    let report = scheduler.tick().await;
    assert_eq!(report.status(), Some(JobStatus::Failed));
    assert_eq!(ids(&actor), vec![survivor]);
    assert!(!actor.lock().is_busy());

    let mut failure = None;
    let mut purged = Vec::new();
    while let Ok(event) = events.try_recv() {
        match event {
            Event::Job(JobEvent::Failed { kind, job_id, .. }) => failure = Some((job_id, kind)),
            Event::Job(JobEvent::Purged { job_ids, .. }) => purged.extend(job_ids),
            _ => {}
        }
    }
    assert_eq!(failure, Some((doomed_id, ErrorKind::Generic)));
    assert_eq!(purged, vec![child]);

    assert_eq!(scheduler.tick().await.status(), Some(JobStatus::Completed));
}

#[tokio::test]
async fn composite_jobs_resume_after_their_plan_and_hook_once() {
    let world = common::world();
    let server = common::server(&world, vec![common::character("ada", 1)]);
    let actor = common::actor(&world, &server, "ada").await;

    let obtain = Job::new(ObtainItem::new("copper_ore", 2)).on_success(DepositResult {
        code: "copper_ore".into(),
    });
    let obtain_id = obtain.id();
    actor.enqueue(obtain, false);

    let mut scheduler = Scheduler::with_seed(actor.clone(), 1);
    let ran: Vec<(runtime::JobId, String, JobStatus)> = common::drain(&mut scheduler, 10)
        .await
        .into_iter()
        .map(|report| match report {
            TickReport::Ran { id, label, status } => (id, label, status),
            other => panic!("unexpected report {other:?}"),
        })
        .collect();

    assert_eq!(ran.len(), 4, "ran: {ran:?}");
    assert_eq!((ran[0].0, ran[0].2), (obtain_id, JobStatus::Suspended));
    assert!(ran[1].1.starts_with("gather copper_ore"));
    assert_eq!(ran[1].2, JobStatus::Completed);
    assert_eq!((ran[2].0, ran[2].2), (obtain_id, JobStatus::Completed));
    assert_eq!(ran[3].1, "deposit all copper_ore");

    let deposits = server
        .actions("ada")
        .into_iter()
        .filter(|action| *action == "deposit_item")
        .count();
    assert_eq!(deposits, 1);
    assert_eq!(server.bank_quantity("copper_ore"), 2);
    assert!(actor.jobs().is_empty());
}

#[tokio::test]
async fn fights_past_the_safety_margins_are_refused() {
    let world = common::world();
    let server = common::server(
        &world,
        vec![common::character("ada", 1), common::character("bo", 1)],
    );
    let mut cautious = common::config(&["ada"]);
    // No finishing HP is ever enough.
    cautious.combat.min_hp_percent = 101;
    let ada = common::actor_with(&world, &server, "ada", cautious).await;
    ada.enqueue(Job::new(Fight::times("chicken", 1)), false);

    let mut scheduler = Scheduler::with_seed(ada.clone(), 1);
    assert_eq!(scheduler.tick().await.status(), Some(JobStatus::Failed));
    assert!(!server.actions("ada").contains(&"fight"));

    let bo = common::actor(&world, &server, "bo").await;
    bo.enqueue(Job::new(Fight::times("chicken", 1)), false);
    let mut scheduler = Scheduler::with_seed(bo.clone(), 1);
    assert_eq!(scheduler.tick().await.status(), Some(JobStatus::Completed));
    assert!(server.actions("bo").contains(&"fight"));
}

#[tokio::test]
async fn interrupts_only_target_a_running_job() {
    let world = common::world();
    let server = common::server(&world, vec![common::character("ada", 1)]);
    let actor = common::actor(&world, &server, "ada").await;

    actor.interrupt();
    actor.suspend();
    actor.resume();
    assert!(!actor.interrupt_token().is_interrupted());

    actor.enqueue(copper(2), false);
    let mut scheduler = Scheduler::with_seed(actor.clone(), 1);
    assert_eq!(scheduler.tick().await.status(), Some(JobStatus::Completed));
    assert_eq!(actor.snapshot().inventory.quantity_of("copper_ore"), 2);
}
