//! Public runtime API surface.
//!
//! The types embedding code interacts with, kept apart from the actor and
//! worker internals.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::CharacterHandle;
