//! Progression and economy engine for Ore Idle, an incremental mining game.
//!
//! The crate has no UI. A front end creates a [`Session`], calls
//! [`Session::tick`] from its frame callback and routes player input through
//! [`Session::dispatch`].

pub mod config;
pub mod error;
pub mod format;
pub mod ore;
pub mod storage;
pub mod time;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::EngineConfig;
pub use error::{CommandError, EconomyError, PrestigeError, SaveError, StorageError};
pub use ore::actions::Command;
pub use ore::logic::BuyQuantity;
pub use ore::save::{LoadOutcome, OfflineReport};
pub use ore::state::{GameState, ResourceId};
pub use ore::upgrade::{UpgradeId, UpgradeKind};
pub use ore::{CommandOutcome, Session};
