/// Ore Idle game state definitions.

use serde::{Deserialize, Serialize};

use super::milestone::MilestoneState;
use super::prestige::{CoreUpgrade, CoreUpgradeKind, PrestigeStatus};
use super::unlock::UnlockState;
use super::upgrade::{create_upgrades, Upgrade, UpgradeId};

/// Number of ore tiers.
pub const RESOURCE_COUNT: usize = 11;

/// Ore tiers, cheapest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceId {
    Iron,
    Copper,
    Nickel,
    Bronze,
    Silver,
    Cobalt,
    Gold,
    Palladium,
    Platinum,
    Titanium,
    Adamantium,
}

impl ResourceId {
    /// All tiers in unlock order.
    pub const ALL: [ResourceId; RESOURCE_COUNT] = [
        ResourceId::Iron,
        ResourceId::Copper,
        ResourceId::Nickel,
        ResourceId::Bronze,
        ResourceId::Silver,
        ResourceId::Cobalt,
        ResourceId::Gold,
        ResourceId::Palladium,
        ResourceId::Platinum,
        ResourceId::Titanium,
        ResourceId::Adamantium,
    ];

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<ResourceId> {
        Self::ALL.get(idx).copied()
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ResourceId::Iron => "Iron",
            ResourceId::Copper => "Copper",
            ResourceId::Nickel => "Nickel",
            ResourceId::Bronze => "Bronze",
            ResourceId::Silver => "Silver",
            ResourceId::Cobalt => "Cobalt",
            ResourceId::Gold => "Gold",
            ResourceId::Palladium => "Palladium",
            ResourceId::Platinum => "Platinum",
            ResourceId::Titanium => "Titanium",
            ResourceId::Adamantium => "Adamantium",
        }
    }

    /// Ore gained per manual mine before any multiplier.
    pub fn base_per_click(self) -> f64 {
        1.0
    }

    /// Automatic production before any upgrade is bought.
    pub fn base_per_second(self) -> f64 {
        0.0
    }

    /// Money received per unit sold, before the global sell bonus.
    pub fn sell_price(self) -> f64 {
        match self {
            ResourceId::Iron => 1.0,
            ResourceId::Copper => 5.0,
            ResourceId::Nickel => 20.0,
            ResourceId::Bronze => 75.0,
            ResourceId::Silver => 250.0,
            ResourceId::Cobalt => 900.0,
            ResourceId::Gold => 3_000.0,
            ResourceId::Palladium => 10_000.0,
            ResourceId::Platinum => 35_000.0,
            ResourceId::Titanium => 120_000.0,
            ResourceId::Adamantium => 400_000.0,
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One ore tier and its current yield.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    /// Ore on hand. Never negative.
    pub count: f64,
    pub per_click: f64,
    /// Base automatic rate before multipliers.
    pub per_second: f64,
    pub sell_price: f64,
}

impl Resource {
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            count: 0.0,
            per_click: id.base_per_click(),
            per_second: id.base_per_second(),
            sell_price: id.sell_price(),
        }
    }

    /// Back to the tier's base values. `sell_price` is fixed.
    pub fn reset(&mut self) {
        self.count = 0.0;
        self.per_click = self.id.base_per_click();
        self.per_second = self.id.base_per_second();
    }
}

/// Per-action click counters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickStats {
    pub mine: u64,
    pub sell: u64,
    pub shop_buy: u64,
    pub unlock: u64,
}

/// Counters for the current epoch. Only ever grow until a reset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub mined: [f64; RESOURCE_COUNT],
    pub sold: [f64; RESOURCE_COUNT],
    pub earned_money: f64,
    pub spent_money: f64,
    pub clicks: ClickStats,
}

impl Stats {
    pub fn mined(&self, id: ResourceId) -> f64 {
        self.mined[id.index()]
    }

    pub fn sold(&self, id: ResourceId) -> f64 {
        self.sold[id.index()]
    }
}

/// Full state of an Ore Idle game. Everything here is persisted except
/// where `save` says otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// One entry per tier, in `ResourceId::ALL` order.
    pub resources: Vec<Resource>,
    pub money: f64,
    /// Meta-currency. Survives prestige.
    pub core_shards: u64,
    pub unlocks: UnlockState,
    /// Catalog of per-resource upgrades, see `create_upgrades`.
    pub upgrades: Vec<Upgrade>,
    pub stats: Stats,
    pub milestones: MilestoneState,
    /// Permanent upgrades bought with core shards.
    pub core_upgrades: Vec<CoreUpgrade>,
    pub prestige: PrestigeStatus,
    pub total_prestiges: u32,
    /// Money earned across all finished epochs.
    pub lifetime_earned_money: f64,
    /// Player toggle for each tier's auto-seller (only matters once bought).
    pub auto_sell_enabled: [bool; RESOURCE_COUNT],
}

impl GameState {
    pub fn new() -> Self {
        Self {
            resources: ResourceId::ALL.iter().map(|&id| Resource::new(id)).collect(),
            money: 0.0,
            core_shards: 0,
            unlocks: UnlockState::default(),
            upgrades: create_upgrades(),
            stats: Stats::default(),
            milestones: MilestoneState::default(),
            core_upgrades: CoreUpgrade::create_all(),
            prestige: PrestigeStatus::Locked,
            total_prestiges: 0,
            lifetime_earned_money: 0.0,
            auto_sell_enabled: [true; RESOURCE_COUNT],
        }
    }

    pub fn resource(&self, id: ResourceId) -> &Resource {
        &self.resources[id.index()]
    }

    pub fn resource_mut(&mut self, id: ResourceId) -> &mut Resource {
        &mut self.resources[id.index()]
    }

    pub fn is_unlocked(&self, id: ResourceId) -> bool {
        self.unlocks.is_unlocked(id)
    }

    pub fn upgrade(&self, id: UpgradeId) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn upgrade_index(&self, id: UpgradeId) -> Option<usize> {
        self.upgrades.iter().position(|u| u.id == id)
    }

    pub fn core_upgrade(&self, kind: CoreUpgradeKind) -> Option<&CoreUpgrade> {
        self.core_upgrades.iter().find(|u| u.kind == kind)
    }

    fn core_bonus(&self, kind: CoreUpgradeKind) -> f64 {
        self.core_upgrade(kind).map_or(0.0, |u| u.bonus())
    }

    /// `1 + level * effect` of the global mine-rate core upgrade.
    pub fn global_mine_multiplier(&self) -> f64 {
        1.0 + self.core_bonus(CoreUpgradeKind::GlobalMineRate)
    }

    /// `1 + level * effect` of the global sell-value core upgrade.
    pub fn global_sell_multiplier(&self) -> f64 {
        1.0 + self.core_bonus(CoreUpgradeKind::GlobalSellValue)
    }

    /// Extra factor on automatic production only.
    pub fn auto_mine_multiplier(&self) -> f64 {
        1.0 + self.core_bonus(CoreUpgradeKind::AutoMineSpeed)
    }

    /// Ore gained by one manual mine.
    pub fn effective_per_click(&self, id: ResourceId) -> f64 {
        self.resource(id).per_click * self.global_mine_multiplier() * self.milestones.multiplier(id)
    }

    /// Ore produced per second by automation.
    pub fn effective_per_second(&self, id: ResourceId) -> f64 {
        self.resource(id).per_second
            * self.milestones.multiplier(id)
            * self.global_mine_multiplier()
            * self.auto_mine_multiplier()
    }

    /// Money per unit sold, including the global sell bonus.
    pub fn effective_sell_price(&self, id: ResourceId) -> f64 {
        self.resource(id).sell_price * self.global_sell_multiplier()
    }

    /// Whether this tier has its auto-seller bought.
    pub fn owns_auto_seller(&self, id: ResourceId) -> bool {
        use super::upgrade::UpgradeKind;
        self.upgrade(UpgradeId::new(id, UpgradeKind::AutoSellerUnlock))
            .is_some_and(|u| u.count > 0)
    }

    /// Whether an auto-sell timer should be running for this tier.
    pub fn auto_sell_active(&self, id: ResourceId) -> bool {
        self.is_unlocked(id) && self.owns_auto_seller(id) && self.auto_sell_enabled[id.index()]
    }

    /// Reset everything an epoch owns: ores, money, unlocks, upgrades,
    /// milestones, stats. Core shards and core upgrades are kept.
    pub fn reset_epoch(&mut self) {
        for r in &mut self.resources {
            r.reset();
        }
        self.money = 0.0;
        self.unlocks = UnlockState::default();
        for u in &mut self.upgrades {
            u.reset();
        }
        self.stats = Stats::default();
        self.milestones = MilestoneState::default();
        self.prestige = PrestigeStatus::Locked;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
