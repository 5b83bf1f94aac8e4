//! Collaborators that reach outside the process: the game server client and
//! the navigator built on top of it.
mod client;
mod navigator;
mod offline;

pub use client::{
    ActionResponse, BankContents, ClientError, ClientResult, FightReport, GameClient,
    RemoteAction,
};
pub use navigator::{Destination, DirectNavigator, NavigationError, Navigator};
pub use offline::OfflineClient;
