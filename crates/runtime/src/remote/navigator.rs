//! Turning "go to X" into moves.

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use game_core::{ContentKind, Layer, Position, Skill, TaskKind};
use thiserror::Error;

use crate::jobs::{JobContext, JobError};
use crate::oracle::WorldState;

use super::client::RemoteAction;

/// An abstract place a job wants the character to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Position(Position),
    Monster(String),
    Resource(String),
    Bank,
    Workshop(Skill),
    TasksMaster(TaskKind),
    Npc(String),
}

impl Destination {
    fn content(&self) -> Option<(ContentKind, &str)> {
        match self {
            Self::Position(_) => None,
            Self::Monster(code) => Some((ContentKind::Monster, code)),
            Self::Resource(code) => Some((ContentKind::Resource, code)),
            Self::Bank => Some((ContentKind::Bank, "bank")),
            Self::Workshop(skill) => Some((ContentKind::Workshop, skill.as_str())),
            Self::TasksMaster(kind) => Some((ContentKind::TasksMaster, kind.as_str())),
            Self::Npc(code) => Some((ContentKind::Npc, code)),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(position) => write!(f, "{position}"),
            Self::Monster(code) => write!(f, "monster {code}"),
            Self::Resource(code) => write!(f, "resource {code}"),
            Self::Bank => f.write_str("bank"),
            Self::Workshop(skill) => write!(f, "{skill} workshop"),
            Self::TasksMaster(kind) => write!(f, "{} tasks master", kind.as_str()),
            Self::Npc(code) => write!(f, "npc {code}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("no known tile for {0}")]
    Unreachable(String),

    #[error("no transition from {from:?} to {to:?}")]
    NoTransition { from: Layer, to: Layer },

    #[error(transparent)]
    Action(#[from] JobError),
}

#[async_trait]
pub trait Navigator: Send + Sync {
    /// Moves the character to `destination`, returning where it ended up.
    async fn navigate_to(
        &self,
        ctx: &JobContext,
        destination: &Destination,
    ) -> Result<Position, NavigationError>;
}

/// Walks straight to the nearest matching tile.
///
/// Tiles on the character's layer are preferred. When the target is on
/// another layer the nearest transition leading there is taken first.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectNavigator;

impl DirectNavigator {
    pub fn resolve(
        world: &WorldState,
        from: &Position,
        destination: &Destination,
    ) -> Result<Position, NavigationError> {
        let now = Utc::now();
        let found = match destination {
            Destination::Position(position) => Some(*position),
            Destination::Bank => world
                .data()
                .nearest_of_kind(from, ContentKind::Bank)
                .map(|tile| tile.position),
            other => other
                .content()
                .and_then(|(kind, code)| world.locate(from, kind, code, now)),
        };
        found.ok_or_else(|| NavigationError::Unreachable(destination.to_string()))
    }

    fn transition_towards(
        world: &WorldState,
        from: &Position,
        to: Layer,
    ) -> Result<Position, NavigationError> {
        world
            .data()
            .tiles()
            .iter()
            .filter(|tile| tile.position.layer == from.layer)
            .filter(|tile| {
                tile.content.as_ref().is_some_and(|content| {
                    content.kind == ContentKind::Transition && content.code == to.as_str()
                })
            })
            .map(|tile| tile.position)
            .min_by_key(|position| position.distance(from))
            .ok_or(NavigationError::NoTransition {
                from: from.layer,
                to,
            })
    }
}

#[async_trait]
impl Navigator for DirectNavigator {
    async fn navigate_to(
        &self,
        ctx: &JobContext,
        destination: &Destination,
    ) -> Result<Position, NavigationError> {
        let mut here = ctx.character().position;
        let target = Self::resolve(ctx.world(), &here, destination)?;

        if target.layer != here.layer {
            let gate = Self::transition_towards(ctx.world(), &here, target.layer)?;
            if gate != here {
                ctx.act(RemoteAction::Move(gate)).await?;
            }
            let response = ctx.act(RemoteAction::Transition).await?;
            here = response.character.position;
            tracing::debug!(
                target: "runtime::job",
                character = ctx.name(),
                layer = here.layer.as_str(),
                "changed layer"
            );
        }

        if here != target {
            let response = ctx.act(RemoteAction::Move(target)).await?;
            here = response.character.position;
        }
        Ok(here)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{GameData, MapContent, MapTile};

    fn tile(id: u32, position: Position, kind: ContentKind, code: &str) -> MapTile {
        MapTile {
            map_id: id,
            position,
            content: Some(MapContent {
                kind,
                code: code.into(),
            }),
        }
    }

    fn world() -> WorldState {
        WorldState::new(GameData::new(
            vec![],
            vec![],
            vec![],
            vec![
                tile(1, Position::new(4, 1), ContentKind::Bank, "bank"),
                tile(2, Position::new(1, 1), ContentKind::Workshop, "mining"),
                tile(3, Position::new(0, 5), ContentKind::Transition, "underground"),
                tile(
                    4,
                    Position::on_layer(2, 2, Layer::Underground),
                    ContentKind::Resource,
                    "iron_rocks",
                ),
            ],
            vec![],
        ))
    }

    #[test]
    fn resolves_workshops_by_skill() {
        let position = DirectNavigator::resolve(
            &world(),
            &Position::ORIGIN,
            &Destination::Workshop(Skill::Mining),
        )
        .expect("workshop found");
        assert_eq!(position, Position::new(1, 1));
    }

    #[test]
    fn unknown_destinations_are_unreachable() {
        let error = DirectNavigator::resolve(
            &world(),
            &Position::ORIGIN,
            &Destination::Monster("dragon".into()),
        )
        .unwrap_err();
        assert!(matches!(error, NavigationError::Unreachable(_)));
    }

    #[test]
    fn transitions_are_found_on_the_current_layer() {
        let gate =
            DirectNavigator::transition_towards(&world(), &Position::ORIGIN, Layer::Underground)
                .expect("gate found");
        assert_eq!(gate, Position::new(0, 5));

        let none = DirectNavigator::transition_towards(
            &world(),
            &Position::on_layer(2, 2, Layer::Underground),
            Layer::Overworld,
        );
        assert!(none.is_err());
    }
}
