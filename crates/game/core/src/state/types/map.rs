//! Map tiles and what they contain.

use super::common::Position;

/// Kind of content placed on a map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContentKind {
    Monster,
    Resource,
    /// Crafting workshop; the code is the skill name.
    Workshop,
    Bank,
    /// Tasks master; the code is `monsters` or `items`.
    TasksMaster,
    Npc,
    /// Layer transition point; the code names the destination layer.
    Transition,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapContent {
    pub kind: ContentKind,
    pub code: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapTile {
    pub map_id: u32,
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub content: Option<MapContent>,
}

impl MapTile {
    pub fn holds(&self, kind: ContentKind, code: &str) -> bool {
        self.content
            .as_ref()
            .is_some_and(|content| content.kind == kind && content.code == code)
    }

    pub fn holds_kind(&self, kind: ContentKind) -> bool {
        self.content
            .as_ref()
            .is_some_and(|content| content.kind == kind)
    }
}
