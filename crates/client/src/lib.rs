//! Offline bot client.
//!
//! The binary is the composition root: it reads the environment and
//! `bot.toml`, loads the world, starts an in-process game server seeded
//! with the configured characters, and runs the bot until ctrl-c.

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod monitor;

pub use bootstrap::{Session, start};
pub use config::{BotFile, ClientConfig, OfflineSettings};
