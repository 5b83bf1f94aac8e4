#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use game_core::{
    Character, ContentKind, EffectKind, Equipment, GameData, ItemDefinition, ItemKind, ItemStack,
    MapContent, MapTile, MonsterDefinition, Position, Recipe, ResourceDefinition, Skill, Slot,
};
use runtime::{
    CharacterActor, DirectNavigator, GameClient, OfflineClient, RuntimeConfig, Scheduler,
    Services, WorldState,
};

fn tile(map_id: u32, x: i32, y: i32, kind: ContentKind, code: &str) -> MapTile {
    MapTile {
        map_id,
        position: Position::new(x, y),
        content: Some(MapContent {
            kind,
            code: code.into(),
        }),
    }
}

/// Bank at the origin with a mining workshop, two rocks and a chicken
/// within a few steps.
pub fn world() -> WorldState {
    WorldState::new(GameData::new(
        vec![
            ItemDefinition::new("copper_ore", 1, ItemKind::Resource),
            ItemDefinition::new("iron_ore", 5, ItemKind::Resource),
            ItemDefinition::new("iron_bar", 5, ItemKind::Resource).with_recipe(Recipe {
                skill: Skill::Mining,
                level: 5,
                quantity: 1,
                items: vec![ItemStack::new("iron_ore", 10)],
            }),
            ItemDefinition::new("feather", 1, ItemKind::Resource),
            ItemDefinition::new("wooden_stick", 1, ItemKind::Weapon)
                .with_effect(EffectKind::AttackEarth, 10),
        ],
        vec![MonsterDefinition::new("chicken", 1, 20).with_drop("feather", 1, 1)],
        vec![
            ResourceDefinition::new("copper_rocks", Skill::Mining, 1).with_drop("copper_ore", 1, 1),
            ResourceDefinition::new("iron_rocks", Skill::Mining, 5).with_drop("iron_ore", 1, 1),
        ],
        vec![
            tile(0, 0, 0, ContentKind::Bank, "bank"),
            tile(1, 1, 0, ContentKind::Workshop, "mining"),
            tile(2, 2, 0, ContentKind::Resource, "iron_rocks"),
            tile(3, 3, 0, ContentKind::Resource, "copper_rocks"),
            tile(4, 0, 1, ContentKind::Monster, "chicken"),
        ],
        vec![],
    ))
}

pub fn character(name: &str, mining: u32) -> Character {
    let mut character = Character::new(name, 1);
    character.skills.insert(Skill::Mining, mining);
    character.equipment = Equipment::builder()
        .item(Slot::Weapon, "wooden_stick")
        .build();
    character
}

pub fn config(names: &[&str]) -> RuntimeConfig {
    RuntimeConfig {
        idle_poll_ms: 5,
        policy_interval_ms: 10,
        enable_policy: false,
        characters: names
            .iter()
            .map(|name| runtime::CharacterConfig::new(*name))
            .collect(),
        ..RuntimeConfig::default()
    }
}

pub fn server(world: &WorldState, characters: Vec<Character>) -> Arc<OfflineClient> {
    let server = OfflineClient::new(world.clone());
    for character in characters {
        server.add_character(character);
    }
    Arc::new(server)
}

/// A single actor wired to `server`, with the bank cache primed.
pub async fn actor(world: &WorldState, server: &Arc<OfflineClient>, name: &str) -> Arc<CharacterActor> {
    actor_with(world, server, name, config(&[name])).await
}

pub async fn actor_with(
    world: &WorldState,
    server: &Arc<OfflineClient>,
    name: &str,
    config: RuntimeConfig,
) -> Arc<CharacterActor> {
    let client: Arc<dyn GameClient> = server.clone();
    let services = Arc::new(Services::new(
        world.clone(),
        client,
        Arc::new(DirectNavigator),
        config,
    ));
    let contents = services.client.bank_items().await.expect("bank loads");
    services.bank.refresh(contents);
    let character = services.client.character(name).await.expect("character loads");
    CharacterActor::new(character, services)
}

/// Ticks until the queue drains or `limit` ticks ran.
pub async fn drain(scheduler: &mut Scheduler, limit: usize) -> Vec<runtime::TickReport> {
    let mut reports = Vec::new();
    for _ in 0..limit {
        let report = scheduler.tick().await;
        if report == runtime::TickReport::Idle {
            break;
        }
        reports.push(report);
    }
    reports
}

pub async fn wait_until(mut done: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if done() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    done()
}
