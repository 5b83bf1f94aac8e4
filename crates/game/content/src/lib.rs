//! Data-driven game content and loaders.
//!
//! This crate turns static data files into the records `game-core` reasons
//! about:
//! - Item catalogs (RON)
//! - Monster catalogs (RON)
//! - Resource catalogs (RON)
//! - NPC merchant catalogs (RON)
//! - Map layouts (RON)
//! - Bot configuration (TOML)
//!
//! Content is loaded once at startup into a [`game_core::GameData`] and read
//! thereafter.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, ItemLoader, LoadResult, MapLoader, MonsterLoader, NpcLoader,
    ResourceLoader,
};
