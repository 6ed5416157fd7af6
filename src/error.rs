//! Error types returned by the engine.
//!
//! Every failure here is recoverable and reported to the caller; none of
//! them leaves the game state half-updated.

use thiserror::Error;

use crate::ore::prestige::CoreUpgradeKind;
use crate::ore::state::ResourceId;
use crate::ore::upgrade::UpgradeId;

/// Failures of mine / sell / buy / unlock.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EconomyError {
    /// The tier has not been unlocked this epoch.
    #[error("{0} is locked")]
    ResourceLocked(ResourceId),

    /// Not enough money for the purchase.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: f64, available: f64 },

    /// The upgrade already owns `max` units (or the request would pass it).
    #[error("{0} cannot be bought past its cap")]
    MaxUpgradeCountReached(UpgradeId),

    #[error("{0} is already unlocked")]
    AlreadyUnlocked(ResourceId),

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("unknown upgrade {0}")]
    UnknownUpgrade(UpgradeId),
}

/// Failures of prestige and core-upgrade purchases.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrestigeError {
    #[error("prestige is not unlocked yet")]
    NotUnlocked,

    #[error("prestige reward {reward} is below the minimum of {minimum}")]
    RewardTooLow { reward: u64, minimum: u64 },

    #[error("{0} is already at max level")]
    MaxLevelReached(CoreUpgradeKind),

    #[error("insufficient core shards: need {required}, have {available}")]
    InsufficientShards { required: u64, available: u64 },
}

/// Failures of the key-value store behind saves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No store at all (private browsing, disabled storage, ...).
    #[error("storage unavailable")]
    Unavailable,

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage error: {0}")]
    Backend(String),
}

/// Failures of save / load.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("failed to serialize save: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The stored blob did not parse.
    #[error("corrupt save: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("save version {found} is not compatible (current {current})")]
    VersionMismatch { found: u32, current: u32 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Anything a dispatched command can fail with.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Economy(#[from] EconomyError),

    #[error(transparent)]
    Prestige(#[from] PrestigeError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Failures while reading the engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
