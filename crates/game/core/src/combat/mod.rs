//! Combat outcome simulation.
//!
//! The simulator is a planning oracle: the runtime asks it, many times and
//! with identical inputs, whether a loadout beats a monster. Everything here
//! is deterministic and side-effect free.
//!
//! # Architecture
//!
//! - [`Fighter`]: flattened combat stats of one side (character loadout or monster)
//! - [`CritAccumulator`]: explicit, seeded critical-strike state
//! - [`damage`]: per-element damage formula
//! - [`FightSimulator`]: turn loop, multi-pass aggregation, safety verdict
//! - [`FightOutcome`]: aggregated result and the outcome ordering

pub mod crit;
pub mod damage;
pub mod fighter;
pub mod outcome;
pub mod simulator;

pub use crit::CritAccumulator;
pub use damage::{elemental_damage, turn_damage};
pub use fighter::{Fighter, UtilityStack};
pub use outcome::{FightOutcome, PassResult, Winner};
pub use simulator::FightSimulator;
