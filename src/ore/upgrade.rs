//! Per-resource upgrade catalog and geometric price math.
//!
//! Every tier owns one upgrade of each [`UpgradeKind`]. The price of the next
//! unit is `base_price * scale^count`; buying `n` units at once costs the
//! floored geometric series, and "buy max" inverts that series with a
//! logarithm before checking the result against the exact sum.

use serde::{Deserialize, Serialize};

use super::state::{Resource, ResourceId};

/// What an upgrade does to its tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// +per_click.
    ClickPower,
    /// +per_second.
    AutoRate,
    /// Buys the tier's auto-seller.
    AutoSellerUnlock,
    /// Shortens the auto-sell interval.
    AutoSellSpeed,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::ClickPower,
        UpgradeKind::AutoRate,
        UpgradeKind::AutoSellerUnlock,
        UpgradeKind::AutoSellSpeed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::ClickPower => "Pickaxe",
            UpgradeKind::AutoRate => "Drill",
            UpgradeKind::AutoSellerUnlock => "Auto-Seller",
            UpgradeKind::AutoSellSpeed => "Sales Team",
        }
    }

    /// Price of the first unit, as a multiple of the tier's sell price.
    fn base_price_factor(self) -> f64 {
        match self {
            UpgradeKind::ClickPower => 15.0,
            UpgradeKind::AutoRate => 50.0,
            UpgradeKind::AutoSellerUnlock => 1_000.0,
            UpgradeKind::AutoSellSpeed => 500.0,
        }
    }

    fn scale(self) -> f64 {
        match self {
            UpgradeKind::ClickPower | UpgradeKind::AutoRate => 1.15,
            UpgradeKind::AutoSellerUnlock => 1.0,
            UpgradeKind::AutoSellSpeed => 1.5,
        }
    }

    fn max(self) -> u32 {
        match self {
            UpgradeKind::ClickPower | UpgradeKind::AutoRate => 100,
            UpgradeKind::AutoSellerUnlock => 1,
            UpgradeKind::AutoSellSpeed => 9,
        }
    }
}

/// Per-unit gain of a ClickPower upgrade.
pub const CLICK_POWER_PER_UNIT: f64 = 1.0;
/// Per-unit gain of an AutoRate upgrade.
pub const AUTO_RATE_PER_UNIT: f64 = 0.5;

/// Identifies one upgrade: the tier it belongs to plus its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeId {
    pub resource: ResourceId,
    pub kind: UpgradeKind,
}

impl UpgradeId {
    pub fn new(resource: ResourceId, kind: UpgradeKind) -> Self {
        Self { resource, kind }
    }
}

impl std::fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.resource.name(), self.kind.label())
    }
}

/// A purchasable upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub id: UpgradeId,
    /// Units owned, `0..=max`.
    pub count: u32,
    pub base_price: f64,
    /// Cached `floor(base_price * scale^count)`.
    pub price: f64,
    pub scale: f64,
    pub max: u32,
}

impl Upgrade {
    pub fn new(id: UpgradeId, base_price: f64, scale: f64, max: u32) -> Self {
        let mut upgrade = Self {
            id,
            count: 0,
            base_price,
            price: base_price,
            scale,
            max,
        };
        upgrade.refresh_price();
        upgrade
    }

    /// Catalog entry for a tier and kind.
    pub fn for_kind(resource: ResourceId, kind: UpgradeKind) -> Self {
        Self::new(
            UpgradeId::new(resource, kind),
            kind.base_price_factor() * resource.sell_price(),
            kind.scale(),
            kind.max(),
        )
    }

    pub fn refresh_price(&mut self) {
        self.price = unit_price(self.base_price, self.scale, self.count);
    }

    pub fn set_count(&mut self, count: u32) {
        self.count = count.min(self.max);
        self.refresh_price();
    }

    pub fn reset(&mut self) {
        self.set_count(0);
    }

    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.count)
    }

    pub fn is_maxed(&self) -> bool {
        self.count >= self.max
    }

    /// Cost of the next `n` units.
    pub fn bulk_cost(&self, n: u32) -> f64 {
        bulk_cost(self.base_price, self.scale, self.count, n)
    }

    /// Most units `money` can buy right now, clamped to the cap.
    pub fn max_affordable(&self, money: f64) -> u32 {
        max_affordable(self.base_price, self.scale, self.count, self.max, money)
    }

    /// Effect of one unit on the owning tier. Additive, never compounding.
    pub fn apply_to(&self, resource: &mut Resource) {
        match self.id.kind {
            UpgradeKind::ClickPower => resource.per_click += CLICK_POWER_PER_UNIT,
            UpgradeKind::AutoRate => resource.per_second += AUTO_RATE_PER_UNIT,
            // Auto-sell upgrades are read from `count` by the scheduler.
            UpgradeKind::AutoSellerUnlock | UpgradeKind::AutoSellSpeed => {}
        }
    }
}

/// Build the full catalog: four upgrades per tier, tier-major order.
pub fn create_upgrades() -> Vec<Upgrade> {
    ResourceId::ALL
        .iter()
        .flat_map(|&r| UpgradeKind::ALL.iter().map(move |&k| Upgrade::for_kind(r, k)))
        .collect()
}

fn is_flat(scale: f64) -> bool {
    (scale - 1.0).abs() < f64::EPSILON
}

/// `floor(base * scale^count)`.
pub fn unit_price(base: f64, scale: f64, count: u32) -> f64 {
    (base * scale.powi(count as i32)).floor()
}

/// Cost of buying `n` more units when `count` are owned.
pub fn bulk_cost(base: f64, scale: f64, count: u32, n: u32) -> f64 {
    if n == 0 {
        return 0.0;
    }
    if is_flat(scale) {
        return base * n as f64;
    }
    let next = base * scale.powi(count as i32);
    (next * (scale.powi(n as i32) - 1.0) / (scale - 1.0)).floor()
}

/// Largest `n <= max - count` whose `bulk_cost` fits in `money`.
///
/// The log inversion gives a first guess; float error can push it one unit
/// either way, so the guess is settled against `bulk_cost` before returning.
pub fn max_affordable(base: f64, scale: f64, count: u32, max: u32, money: f64) -> u32 {
    let remaining = max.saturating_sub(count);
    if remaining == 0 || money <= 0.0 || base <= 0.0 {
        return 0;
    }
    let next = base * scale.powi(count as i32);
    let guess = if is_flat(scale) {
        (money / next).floor()
    } else {
        ((1.0 + money * (scale - 1.0) / next).ln() / scale.ln()).floor()
    };
    let mut n = if guess.is_finite() && guess > 0.0 {
        (guess.min(remaining as f64)) as u32
    } else {
        0
    };
    while n > 0 && bulk_cost(base, scale, count, n) > money {
        n -= 1;
    }
    while n < remaining && bulk_cost(base, scale, count, n + 1) <= money {
        n += 1;
    }
    n
}
