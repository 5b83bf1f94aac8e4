//! Shared world state.
//!
//! [`WorldState`] bundles the static catalog, loaded once at startup, with the
//! short-lived world events the server announces. The catalog is immutable and
//! read without synchronization; events sit behind a lock that is only held
//! for the duration of a copy.
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use game_core::{ActiveEvent, ContentKind, GameData, MapTile, Position};

#[derive(Clone, Default)]
pub struct WorldState {
    data: Arc<GameData>,
    events: Arc<RwLock<Vec<ActiveEvent>>>,
}

impl WorldState {
    pub fn new(data: GameData) -> Self {
        Self::from_shared(Arc::new(data))
    }

    pub fn from_shared(data: Arc<GameData>) -> Self {
        Self {
            data,
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn shared_data(&self) -> Arc<GameData> {
        Arc::clone(&self.data)
    }

    /// Replaces the announced events wholesale.
    pub fn set_events(&self, events: Vec<ActiveEvent>) {
        *self.events.write().unwrap_or_else(PoisonError::into_inner) = events;
    }

    pub fn add_event(&self, event: ActiveEvent) {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Events that have not expired at `now`.
    pub fn active_events(&self, now: DateTime<Utc>) -> Vec<ActiveEvent> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| event.is_active(now))
            .cloned()
            .collect()
    }

    /// Drops expired events, returning how many were removed.
    pub fn prune_events(&self, now: DateTime<Utc>) -> usize {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        let before = events.len();
        events.retain(|event| event.is_active(now));
        before - events.len()
    }

    /// Closest place to find `code` of `kind`, counting live events as
    /// extra tiles.
    pub fn locate(
        &self,
        from: &Position,
        kind: ContentKind,
        code: &str,
        now: DateTime<Utc>,
    ) -> Option<Position> {
        let static_tile = self
            .data
            .nearest_tile(from, kind, code)
            .map(|tile: &MapTile| tile.position);
        let event_tile = self
            .active_events(now)
            .into_iter()
            .filter(|event| event.content.kind == kind && event.content.code == code)
            .map(|event| event.position)
            .min_by_key(|position| (position.layer != from.layer, position.distance(from)));

        match (static_tile, event_tile) {
            (Some(a), Some(b)) => Some(
                if (b.layer != from.layer, b.distance(from)) < (a.layer != from.layer, a.distance(from))
                {
                    b
                } else {
                    a
                },
            ),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use game_core::{MapContent, MonsterDefinition};

    fn world() -> WorldState {
        WorldState::new(GameData::new(
            vec![],
            vec![MonsterDefinition::new("cultist", 10, 200)],
            vec![],
            vec![MapTile {
                map_id: 1,
                position: Position::new(9, 9),
                content: Some(MapContent {
                    kind: ContentKind::Monster,
                    code: "cultist".into(),
                }),
            }],
            vec![],
        ))
    }

    fn event(position: Position, expiration: DateTime<Utc>) -> ActiveEvent {
        ActiveEvent {
            code: "cult_gathering".into(),
            content: MapContent {
                kind: ContentKind::Monster,
                code: "cultist".into(),
            },
            position,
            expiration,
        }
    }

    #[test]
    fn expired_events_are_hidden_and_pruned() {
        let world = world();
        let now = Utc::now();
        world.add_event(event(Position::new(1, 1), now - Duration::seconds(1)));
        world.add_event(event(Position::new(2, 2), now + Duration::minutes(5)));

        assert_eq!(world.active_events(now).len(), 1);
        assert_eq!(world.prune_events(now), 1);
    }

    #[test]
    fn locate_prefers_a_closer_event() {
        let world = world();
        let now = Utc::now();
        assert_eq!(
            world.locate(&Position::ORIGIN, ContentKind::Monster, "cultist", now),
            Some(Position::new(9, 9))
        );

        world.add_event(event(Position::new(1, 0), now + Duration::minutes(5)));
        assert_eq!(
            world.locate(&Position::ORIGIN, ContentKind::Monster, "cultist", now),
            Some(Position::new(1, 0))
        );
    }
}
