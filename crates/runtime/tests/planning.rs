mod common;

use std::sync::Arc;
use std::time::Duration;

use game_core::{Inventory, ItemStack, Skill};
use runtime::jobs::kinds::ObtainItem;
use runtime::{GameClient, OfflineClient, Runtime, RuntimeConfig, SkillGoal};

async fn start(server: &Arc<OfflineClient>, config: RuntimeConfig) -> Runtime {
    let client: Arc<dyn GameClient> = server.clone();
    Runtime::builder()
        .config(config)
        .world(common::world())
        .client(client)
        .seed(3)
        .build()
        .await
        .expect("runtime starts")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn iron_bars_come_from_bank_stock_then_the_rocks() {
    let world = common::world();
    let server = common::server(&world, vec![common::character("ada", 5)]);
    server.set_bank([ItemStack::new("iron_ore", 15)], 0);
    let runtime = start(&server, common::config(&["ada"])).await;

    let ada = runtime.character("ada").expect("ada runs");
    ada.enqueue(ObtainItem::new("iron_bar", 2));
    let done = common::wait_until(
        || ada.is_idle() && ada.snapshot().held("iron_bar") >= 2,
        Duration::from_secs(10),
    )
    .await;
    assert!(done, "jobs left: {:?}", ada.jobs());

    let actions = server.actions("ada");
    assert!(actions.contains(&"withdraw_item"));
    assert!(actions.contains(&"gather"));
    assert!(actions.contains(&"craft"));
    assert_eq!(server.bank_quantity("iron_ore"), 0);
    assert_eq!(ada.wished("iron_bar"), 0);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ore_that_does_not_fit_is_stashed_and_crafted_in_rounds() {
    let world = common::world();
    let mut ada = common::character("ada", 5);
    ada.inventory = Inventory::new(25);
    let server = common::server(&world, vec![ada]);
    let runtime = start(&server, common::config(&["ada"])).await;

    let ada = runtime.character("ada").expect("ada runs");
    ada.enqueue(ObtainItem::new("iron_bar", 3));
    let done = common::wait_until(
        || ada.is_idle() && ada.snapshot().held("iron_bar") >= 3,
        Duration::from_secs(10),
    )
    .await;
    assert!(done, "jobs left: {:?}", ada.jobs());

    let actions = server.actions("ada");
    let crafts = actions.iter().filter(|action| **action == "craft").count();
    assert_eq!(crafts, 2);
    assert!(actions.contains(&"deposit_item"));
    assert!(actions.contains(&"withdraw_item"));
    assert_eq!(server.bank_quantity("iron_ore"), 0);
    assert_eq!(ada.snapshot().held("iron_ore"), 0);
    // The stash reservation went back as the craft withdrew the ore.
    let bank = &runtime.services().bank;
    bank.record_deposit("iron_ore", 5);
    assert_eq!(bank.available_quantity("iron_ore", "bo", false), 5);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_characters_never_plan_on_the_same_stock() {
    let world = common::world();
    let server = common::server(
        &world,
        vec![common::character("ada", 5), common::character("bo", 5)],
    );
    server.set_bank([ItemStack::new("iron_ore", 10)], 0);
    let runtime = start(&server, common::config(&["ada", "bo"])).await;

    let ada = runtime.character("ada").expect("ada runs");
    let bo = runtime.character("bo").expect("bo runs");
    bo.suspend();
    ada.enqueue(ObtainItem::new("iron_bar", 1));
    bo.enqueue(ObtainItem::new("iron_bar", 1));

    // Ada's plan claims the stock as soon as it is queued.
    let planned = common::wait_until(
        || {
            ada.jobs().iter().any(|job| job.label.starts_with("withdraw"))
                || ada.snapshot().held("iron_ore") > 0
                || ada.snapshot().held("iron_bar") > 0
        },
        Duration::from_secs(5),
    )
    .await;
    assert!(planned);
    bo.resume();

    let done = common::wait_until(
        || {
            runtime
                .characters()
                .iter()
                .all(|handle| handle.is_idle() && handle.snapshot().held("iron_bar") == 1)
        },
        Duration::from_secs(10),
    )
    .await;
    assert!(done, "ada: {:?}, bo: {:?}", ada.jobs(), bo.jobs());

    assert!(server.actions("ada").contains(&"withdraw_item"));
    assert!(!server.actions("bo").contains(&"withdraw_item"));
    assert!(server.actions("bo").contains(&"gather"));
    assert_eq!(server.bank_quantity("iron_ore"), 0);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn the_policy_trains_idle_characters() {
    let world = common::world();
    let server = Arc::new(OfflineClient::new(world.clone()).with_leveling(2));
    server.add_character(common::character("ada", 1));

    let mut config = common::config(&["ada"]);
    config.enable_policy = true;
    config.characters[0].train = vec![SkillGoal {
        skill: Skill::Mining,
        level: 3,
    }];
    let runtime = start(&server, config).await;

    let ada = runtime.character("ada").expect("ada runs");
    let trained = common::wait_until(
        || ada.snapshot().skill_level(Skill::Mining) >= 3,
        Duration::from_secs(10),
    )
    .await;
    assert!(trained, "actions: {:?}", server.actions("ada"));

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn builder_rejects_incomplete_setups() {
    let world = common::world();
    let server = common::server(&world, vec![common::character("ada", 1)]);

    let missing_client = Runtime::builder()
        .config(common::config(&["ada"]))
        .world(world.clone())
        .build()
        .await;
    assert!(matches!(missing_client, Err(runtime::RuntimeError::MissingClient)));

    let client: Arc<dyn GameClient> = server.clone();
    let duplicate = Runtime::builder()
        .config(common::config(&["ada", "ada"]))
        .world(world.clone())
        .client(client.clone())
        .build()
        .await;
    assert!(matches!(
        duplicate,
        Err(runtime::RuntimeError::DuplicateCharacter(name)) if name == "ada"
    ));

    let unknown = Runtime::builder()
        .config(common::config(&["zed"]))
        .world(world)
        .client(client)
        .build()
        .await;
    assert!(matches!(unknown, Err(runtime::RuntimeError::Character { .. })));
}
