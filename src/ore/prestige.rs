//! Prestige: trade an epoch's progress for core shards, and spend shards on
//! permanent core upgrades.

use serde::{Deserialize, Serialize};

use crate::error::PrestigeError;

use super::state::{GameState, ResourceId};

/// Prestige availability for the current epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrestigeStatus {
    #[default]
    Locked,
    /// Latched when nickel is unlocked; stays until the next reset.
    Unlocked,
}

/// Tier whose unlock opens prestige.
pub const PRESTIGE_GATE: ResourceId = ResourceId::Nickel;

/// Money that counts as one "square" of reward.
const REWARD_MONEY_UNIT: f64 = 1_000_000.0;

/// Milestones per bonus shard.
const MILESTONES_PER_SHARD: usize = 3;

/// Permanent upgrades bought with core shards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreUpgradeKind {
    /// +mine rate on clicks and automation.
    GlobalMineRate,
    /// +sell value everywhere.
    GlobalSellValue,
    /// +automatic production only.
    AutoMineSpeed,
}

impl CoreUpgradeKind {
    pub const ALL: [CoreUpgradeKind; 3] = [
        CoreUpgradeKind::GlobalMineRate,
        CoreUpgradeKind::GlobalSellValue,
        CoreUpgradeKind::AutoMineSpeed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CoreUpgradeKind::GlobalMineRate => "Resonant Core",
            CoreUpgradeKind::GlobalSellValue => "Gilded Core",
            CoreUpgradeKind::AutoMineSpeed => "Overclocked Core",
        }
    }
}

impl std::fmt::Display for CoreUpgradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A permanent upgrade. Never reset.
#[derive(Clone, Debug, PartialEq)]
pub struct CoreUpgrade {
    pub kind: CoreUpgradeKind,
    pub level: u32,
    pub max_level: u32,
    pub base_cost: f64,
    pub cost_scale: f64,
    /// Bonus fraction per level.
    pub effect: f64,
}

impl CoreUpgrade {
    pub fn new(kind: CoreUpgradeKind) -> Self {
        let (base_cost, cost_scale, effect, max_level) = match kind {
            CoreUpgradeKind::GlobalMineRate => (1.0, 1.5, 0.10, 20),
            CoreUpgradeKind::GlobalSellValue => (1.0, 1.5, 0.10, 20),
            CoreUpgradeKind::AutoMineSpeed => (2.0, 2.0, 0.25, 8),
        };
        Self {
            kind,
            level: 0,
            max_level,
            base_cost,
            cost_scale,
            effect,
        }
    }

    pub fn create_all() -> Vec<CoreUpgrade> {
        CoreUpgradeKind::ALL.iter().map(|&k| CoreUpgrade::new(k)).collect()
    }

    /// `floor(base_cost * cost_scale^level)` shards.
    pub fn cost(&self) -> u64 {
        (self.base_cost * self.cost_scale.powi(self.level as i32)).floor() as u64
    }

    /// `level * effect`, linear in level.
    pub fn bonus(&self) -> f64 {
        self.level as f64 * self.effect
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }
}

/// Result of a successful prestige.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrestigeOutcome {
    pub shards_gained: u64,
    pub total_shards: u64,
    pub total_prestiges: u32,
}

/// Latch prestige open once the gate tier is unlocked.
pub fn refresh_status(state: &mut GameState) {
    if state.prestige == PrestigeStatus::Locked && state.is_unlocked(PRESTIGE_GATE) {
        state.prestige = PrestigeStatus::Unlocked;
        log::info!("prestige unlocked");
    }
}

/// Shards a prestige right now would pay. Never below 1.
pub fn calculate_reward(state: &GameState) -> u64 {
    let earned = state.stats.earned_money.max(0.0);
    let from_money = (earned / REWARD_MONEY_UNIT).sqrt().floor() as u64;
    let from_milestones = (state.milestones.achieved_count() / MILESTONES_PER_SHARD) as u64;
    (from_money + from_milestones).max(1)
}

/// Convert the epoch into shards and reset it.
///
/// Either everything happens or nothing does: the checks run before the
/// first mutation.
pub fn prestige(state: &mut GameState, min_reward: u64) -> Result<PrestigeOutcome, PrestigeError> {
    if state.prestige != PrestigeStatus::Unlocked {
        return Err(PrestigeError::NotUnlocked);
    }
    let reward = calculate_reward(state);
    if reward < min_reward {
        return Err(PrestigeError::RewardTooLow {
            reward,
            minimum: min_reward,
        });
    }

    state.core_shards += reward;
    state.total_prestiges += 1;
    state.lifetime_earned_money += state.stats.earned_money;
    state.reset_epoch();

    log::info!(
        "prestige #{}: +{} core shards (total {})",
        state.total_prestiges,
        reward,
        state.core_shards
    );

    Ok(PrestigeOutcome {
        shards_gained: reward,
        total_shards: state.core_shards,
        total_prestiges: state.total_prestiges,
    })
}

/// Buy one level of a core upgrade. Returns the new level.
pub fn purchase_core_upgrade(
    state: &mut GameState,
    kind: CoreUpgradeKind,
) -> Result<u32, PrestigeError> {
    let Some(idx) = state.core_upgrades.iter().position(|u| u.kind == kind) else {
        return Err(PrestigeError::MaxLevelReached(kind));
    };
    let upgrade = &state.core_upgrades[idx];
    if upgrade.is_maxed() {
        return Err(PrestigeError::MaxLevelReached(kind));
    }
    let cost = upgrade.cost();
    if state.core_shards < cost {
        return Err(PrestigeError::InsufficientShards {
            required: cost,
            available: state.core_shards,
        });
    }

    state.core_shards -= cost;
    let upgrade = &mut state.core_upgrades[idx];
    upgrade.level += 1;
    log::info!("{} -> level {} ({} shards)", kind, upgrade.level, cost);
    Ok(upgrade.level)
}
