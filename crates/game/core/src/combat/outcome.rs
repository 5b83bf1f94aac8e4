//! Fight results and how they compare.

use core::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Winner {
    Player,
    Monster,
}

/// Result of one simulated pass with a fixed critical-strike phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassResult {
    pub winner: Winner,
    pub player_hp: i32,
    pub monster_hp: i32,
    pub turns: u32,
    pub potions_used: u32,
}

/// Aggregated, immutable result of a simulated fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FightOutcome {
    pub winner: Winner,
    /// Remaining player HP, averaged across passes.
    pub player_hp: i32,
    pub player_max_hp: i32,
    /// Remaining monster HP, averaged across passes.
    pub monster_hp: i32,
    pub turns: u32,
    pub potions_used: u32,
    /// Safety-gated recommendation to engage.
    pub should_fight: bool,
}

impl FightOutcome {
    pub fn is_win(&self) -> bool {
        self.winner == Winner::Player
    }

    /// Compares two outcomes; `Greater` means `self` is the better one.
    ///
    /// A win beats a loss. Between wins: fewer turns, then more player HP
    /// left, then less monster HP left. Between losses: less monster HP
    /// left, then more player HP left.
    pub fn compare(&self, other: &FightOutcome) -> Ordering {
        match (self.is_win(), other.is_win()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => other
                .turns
                .cmp(&self.turns)
                .then_with(|| self.player_hp.cmp(&other.player_hp))
                .then_with(|| other.monster_hp.cmp(&self.monster_hp)),
            (false, false) => other
                .monster_hp
                .cmp(&self.monster_hp)
                .then_with(|| self.player_hp.cmp(&other.player_hp)),
        }
    }

    pub fn is_better_than(&self, other: &FightOutcome) -> bool {
        self.compare(other) == Ordering::Greater
    }
}
