//! Collaborators shared by every actor, handed to jobs explicitly.

use std::sync::Arc;

use game_core::EquipmentOptimizer;

use crate::bank::BankCache;
use crate::config::RuntimeConfig;
use crate::events::EventBus;
use crate::oracle::WorldState;
use crate::remote::{GameClient, Navigator};

#[derive(Clone)]
pub struct Services {
    pub world: WorldState,
    pub client: Arc<dyn GameClient>,
    pub navigator: Arc<dyn Navigator>,
    pub bank: Arc<BankCache>,
    pub events: EventBus,
    pub config: Arc<RuntimeConfig>,
    pub optimizer: EquipmentOptimizer,
}

impl Services {
    pub fn new(
        world: WorldState,
        client: Arc<dyn GameClient>,
        navigator: Arc<dyn Navigator>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            bank: Arc::new(BankCache::new(config.reservation_ttl())),
            events: EventBus::with_capacity(config.event_buffer_size),
            optimizer: EquipmentOptimizer::new(config.combat.clone()),
            config: Arc::new(config),
            world,
            client,
            navigator,
        }
    }
}
