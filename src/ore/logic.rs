//! Ore Idle economy: pure functions over `GameState`, fully testable.

use crate::error::EconomyError;
use crate::format::format_number;

use super::prestige;
use super::state::{GameState, ResourceId};
use super::unlock::unlock_cost;
use super::upgrade::UpgradeId;

/// How many units a buy request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuyQuantity {
    One,
    /// As many as money and the cap allow.
    Max,
    /// Exactly `n`, or nothing.
    Units(u32),
}

/// A completed upgrade purchase.
#[derive(Clone, Debug, PartialEq)]
pub struct Purchase {
    pub id: UpgradeId,
    pub units: u32,
    pub cost: f64,
}

/// Credit freshly mined ore to the epoch stats and re-check milestones.
pub(crate) fn record_mined(state: &mut GameState, id: ResourceId, amount: f64) {
    state.stats.mined[id.index()] += amount;
    let mined = state.stats.mined(id);
    for threshold in state.milestones.recompute(id, mined) {
        log::info!(
            "milestone: {} mined {} (x{:.2})",
            id,
            format_number(threshold),
            state.milestones.multiplier(id)
        );
    }
}

/// Manual mine. Returns the amount gained.
pub fn mine(state: &mut GameState, id: ResourceId) -> Result<f64, EconomyError> {
    if !state.is_unlocked(id) {
        return Err(EconomyError::ResourceLocked(id));
    }
    let amount = state.effective_per_click(id);
    state.resource_mut(id).count += amount;
    state.stats.clicks.mine += 1;
    record_mined(state, id, amount);
    Ok(amount)
}

/// Sell the whole stock of a tier. Returns the cash earned (0 when empty).
pub fn sell(state: &mut GameState, id: ResourceId, is_auto: bool) -> Result<f64, EconomyError> {
    if !state.is_unlocked(id) {
        return Err(EconomyError::ResourceLocked(id));
    }
    let quantity = state.resource(id).count;
    if quantity <= 0.0 {
        return Ok(0.0);
    }
    let cash = quantity * state.effective_sell_price(id);
    state.money += cash;
    state.resource_mut(id).count = 0.0;
    state.stats.sold[id.index()] += quantity;
    state.stats.earned_money += cash;
    if !is_auto {
        state.stats.clicks.sell += 1;
    }
    Ok(cash)
}

/// Automatic production for `elapsed_secs` of real time.
/// Locked tiers produce nothing.
pub fn auto_produce(state: &mut GameState, id: ResourceId, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 || !state.is_unlocked(id) {
        return 0.0;
    }
    let amount = state.effective_per_second(id) * elapsed_secs;
    if amount <= 0.0 {
        return 0.0;
    }
    state.resource_mut(id).count += amount;
    record_mined(state, id, amount);
    amount
}

/// Run automatic production on every tier.
pub fn produce_all(state: &mut GameState, elapsed_secs: f64) {
    for id in ResourceId::ALL {
        auto_produce(state, id, elapsed_secs);
    }
}

/// Buy exactly `units` of an upgrade, or nothing at all.
pub fn purchase_units(
    state: &mut GameState,
    id: UpgradeId,
    units: u32,
) -> Result<Purchase, EconomyError> {
    if units == 0 {
        return Err(EconomyError::InvalidQuantity);
    }
    if !state.is_unlocked(id.resource) {
        return Err(EconomyError::ResourceLocked(id.resource));
    }
    let idx = state
        .upgrade_index(id)
        .ok_or(EconomyError::UnknownUpgrade(id))?;
    if units > state.upgrades[idx].remaining() {
        return Err(EconomyError::MaxUpgradeCountReached(id));
    }
    let cost = state.upgrades[idx].bulk_cost(units);
    if state.money < cost {
        return Err(EconomyError::InsufficientFunds {
            required: cost,
            available: state.money,
        });
    }

    state.money -= cost;
    state.stats.spent_money += cost;
    state.stats.clicks.shop_buy += 1;

    let upgrade = state.upgrades[idx].clone();
    let resource = state.resource_mut(id.resource);
    for _ in 0..units {
        upgrade.apply_to(resource);
    }
    let new_count = upgrade.count + units;
    state.upgrades[idx].set_count(new_count);

    log::debug!("bought {} x{} for {}", id, units, format_number(cost));
    Ok(Purchase { id, units, cost })
}

/// Buy one unit, the affordable maximum, or an exact amount.
pub fn buy_upgrade(
    state: &mut GameState,
    id: UpgradeId,
    quantity: BuyQuantity,
) -> Result<Purchase, EconomyError> {
    if !state.is_unlocked(id.resource) {
        return Err(EconomyError::ResourceLocked(id.resource));
    }
    let units = match quantity {
        BuyQuantity::Units(n) => n,
        BuyQuantity::One => 1,
        BuyQuantity::Max => {
            let upgrade = state.upgrade(id).ok_or(EconomyError::UnknownUpgrade(id))?;
            if upgrade.is_maxed() {
                return Err(EconomyError::MaxUpgradeCountReached(id));
            }
            match upgrade.max_affordable(state.money) {
                0 => {
                    return Err(EconomyError::InsufficientFunds {
                        required: upgrade.price,
                        available: state.money,
                    })
                }
                n => n,
            }
        }
    };
    purchase_units(state, id, units)
}

/// Spend money to open a tier.
pub fn attempt_unlock(state: &mut GameState, id: ResourceId) -> Result<(), EconomyError> {
    if state.is_unlocked(id) {
        return Err(EconomyError::AlreadyUnlocked(id));
    }
    let cost = unlock_cost(id);
    if state.money < cost {
        return Err(EconomyError::InsufficientFunds {
            required: cost,
            available: state.money,
        });
    }

    state.money -= cost;
    state.stats.spent_money += cost;
    state.stats.clicks.unlock += 1;
    state.unlocks.set_unlocked(id);
    log::info!("{} unlocked for {}", id, format_number(cost));

    prestige::refresh_status(state);
    Ok(())
}

/// Turn a tier's auto-seller on or off. Persisted with the save.
pub fn toggle_auto_sell(state: &mut GameState, id: ResourceId, enabled: bool) {
    state.auto_sell_enabled[id.index()] = enabled;
}

/// Rebuild every tier's rates from base values plus owned upgrades.
pub fn rebuild_rates(state: &mut GameState) {
    for r in &mut state.resources {
        r.per_click = r.id.base_per_click();
        r.per_second = r.id.base_per_second();
    }
    for upgrade in &state.upgrades {
        let resource = &mut state.resources[upgrade.id.resource.index()];
        for _ in 0..upgrade.count {
            upgrade.apply_to(resource);
        }
    }
}
