//! Assembles the offline world, the offline server and the runtime.
use std::sync::Arc;

use anyhow::{Context, Result};
use game_content::ContentFactory;
use game_core::{Character, Position};
use runtime::{GameClient, OfflineClient, Runtime, WorldState};

use crate::config::{BotFile, ClientConfig, OfflineSettings};

/// Everything the binary keeps alive while the bot runs.
pub struct Session {
    pub runtime: Runtime,
    pub server: Arc<OfflineClient>,
}

/// Load the world from the data directory and start every configured
/// character against an in-process server.
pub async fn start(config: &ClientConfig, file: BotFile) -> Result<Session> {
    let data = ContentFactory::new(&config.data_dir)
        .load_world()
        .with_context(|| format!("loading world from {}", config.data_dir.display()))?;
    let world = WorldState::new(data);
    tracing::info!(
        items = world.data().items().count(),
        tiles = world.data().tiles().len(),
        "world loaded"
    );

    let server = Arc::new(offline_server(&world, &file));
    let mut builder = Runtime::builder()
        .config(file.runtime)
        .world(world)
        .client(Arc::clone(&server) as Arc<dyn GameClient>);
    if let Some(seed) = config.seed {
        builder = builder.seed(seed);
    }
    let runtime = builder.build().await.context("starting runtime")?;
    Ok(Session { runtime, server })
}

fn offline_server(world: &WorldState, file: &BotFile) -> OfflineClient {
    let settings = &file.offline;
    let mut server = OfflineClient::with_tuning(world.clone(), file.runtime.combat.clone())
        .with_cooldown(settings.cooldown());
    if settings.actions_per_level > 0 {
        server = server.with_leveling(settings.actions_per_level);
    }
    server.set_bank(settings.bank_items.iter().cloned(), settings.bank_gold);
    for entry in &file.runtime.characters {
        server.add_character(starting_character(&entry.name, settings));
    }
    server
}

fn starting_character(name: &str, settings: &OfflineSettings) -> Character {
    let mut character = Character::new(name, settings.start_level.max(1));
    let (x, y) = settings.start_position;
    character.position = Position::new(x, y);
    for stack in &settings.starter_items {
        character.inventory.add(&stack.code, stack.quantity);
    }
    character
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starters_land_in_the_inventory() {
        let settings = OfflineSettings {
            start_level: 0,
            starter_items: vec![game_core::ItemStack::new("apple", 4)],
            ..OfflineSettings::default()
        };
        let character = starting_character("ada", &settings);
        assert_eq!(character.level, 1);
        assert_eq!(character.position, Position::new(4, 1));
        assert_eq!(character.inventory.quantity_of("apple"), 4);
    }
}
