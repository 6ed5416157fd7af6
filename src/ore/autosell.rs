//! Per-tier auto-sell timers.
//!
//! A timer runs for every tier that is unlocked, owns its auto-seller and has
//! auto-selling switched on. Timers are transient: they are rebuilt from the
//! game state after a load, a resume, or any purchase.

use super::logic;
use super::state::{GameState, ResourceId, RESOURCE_COUNT};
use super::upgrade::{UpgradeId, UpgradeKind};

pub const BASE_INTERVAL_SECS: f64 = 10.0;
/// Interval cut per Sales Team unit.
pub const INTERVAL_STEP_SECS: f64 = 1.0;
pub const MIN_INTERVAL_SECS: f64 = 1.0;

/// Seconds between automatic sells for a given number of speed units.
pub fn auto_sell_interval(speed_units: u32) -> f64 {
    (BASE_INTERVAL_SECS - speed_units as f64 * INTERVAL_STEP_SECS).max(MIN_INTERVAL_SECS)
}

/// Interval the tier's timer should use right now.
pub fn interval_for(state: &GameState, id: ResourceId) -> f64 {
    let units = state
        .upgrade(UpgradeId::new(id, UpgradeKind::AutoSellSpeed))
        .map_or(0, |u| u.count);
    auto_sell_interval(units)
}

#[derive(Clone, Debug, PartialEq)]
pub struct AutoSellTimer {
    pub interval_secs: f64,
    elapsed_secs: f64,
}

/// One auto-sell sale.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoSale {
    pub resource: ResourceId,
    pub cash: f64,
}

#[derive(Clone, Debug, Default)]
pub struct AutoSellScheduler {
    timers: [Option<AutoSellTimer>; RESOURCE_COUNT],
}

impl AutoSellScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh timer. A timer already running for the tier is dropped
    /// first, so there is never more than one per tier.
    pub fn start(&mut self, id: ResourceId, interval_secs: f64) {
        self.stop(id);
        self.timers[id.index()] = Some(AutoSellTimer {
            interval_secs: interval_secs.max(MIN_INTERVAL_SECS),
            elapsed_secs: 0.0,
        });
    }

    pub fn stop(&mut self, id: ResourceId) {
        self.timers[id.index()] = None;
    }

    pub fn stop_all(&mut self) {
        for t in &mut self.timers {
            *t = None;
        }
    }

    pub fn is_running(&self, id: ResourceId) -> bool {
        self.timers[id.index()].is_some()
    }

    pub fn running_count(&self) -> usize {
        self.timers.iter().filter(|t| t.is_some()).count()
    }

    pub fn interval(&self, id: ResourceId) -> Option<f64> {
        self.timers[id.index()].as_ref().map(|t| t.interval_secs)
    }

    /// Bring the timers in line with the game state. Timers whose interval
    /// is unchanged keep their progress.
    pub fn sync(&mut self, state: &GameState) {
        for id in ResourceId::ALL {
            if !state.auto_sell_active(id) {
                self.stop(id);
                continue;
            }
            let interval = interval_for(state, id);
            let unchanged = self
                .interval(id)
                .is_some_and(|current| (current - interval).abs() < f64::EPSILON);
            if !unchanged {
                self.start(id, interval);
            }
        }
    }

    /// Advance every timer and sell the tiers whose interval elapsed.
    pub fn tick(&mut self, state: &mut GameState, elapsed_secs: f64) -> Vec<AutoSale> {
        let mut sales = Vec::new();
        if elapsed_secs <= 0.0 {
            return sales;
        }
        for id in ResourceId::ALL {
            let Some(timer) = self.timers[id.index()].as_mut() else {
                continue;
            };
            timer.elapsed_secs += elapsed_secs;
            if timer.elapsed_secs < timer.interval_secs {
                continue;
            }
            // Selling empties the stock, so one sale covers any number of
            // missed intervals.
            timer.elapsed_secs %= timer.interval_secs;
            match logic::sell(state, id, true) {
                Ok(cash) if cash > 0.0 => sales.push(AutoSale { resource: id, cash }),
                Ok(_) => {}
                Err(e) => {
                    log::warn!("auto-sell stopped: {e}");
                    self.stop(id);
                }
            }
        }
        sales
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_iron_seller() -> GameState {
        let mut state = GameState::new();
        let idx = state
            .upgrade_index(UpgradeId::new(ResourceId::Iron, UpgradeKind::AutoSellerUnlock))
            .unwrap();
        state.upgrades[idx].set_count(1);
        state
    }

    #[test]
    fn interval_shrinks_and_floors() {
        assert!((auto_sell_interval(0) - 10.0).abs() < f64::EPSILON);
        assert!((auto_sell_interval(3) - 7.0).abs() < f64::EPSILON);
        assert!((auto_sell_interval(9) - 1.0).abs() < f64::EPSILON);
        assert!((auto_sell_interval(50) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn start_twice_keeps_one_timer() {
        let mut s = AutoSellScheduler::new();
        s.start(ResourceId::Iron, 10.0);
        s.start(ResourceId::Iron, 5.0);
        assert_eq!(s.running_count(), 1);
        assert_eq!(s.interval(ResourceId::Iron), Some(5.0));
    }

    #[test]
    fn sync_starts_only_active_tiers() {
        let state = with_iron_seller();
        let mut s = AutoSellScheduler::new();
        s.sync(&state);
        assert!(s.is_running(ResourceId::Iron));
        assert_eq!(s.running_count(), 1);
    }

    #[test]
    fn sync_stops_disabled_tier() {
        let mut state = with_iron_seller();
        let mut s = AutoSellScheduler::new();
        s.sync(&state);
        state.auto_sell_enabled[0] = false;
        s.sync(&state);
        assert!(!s.is_running(ResourceId::Iron));
    }

    #[test]
    fn sync_picks_up_speed_upgrade() {
        let mut state = with_iron_seller();
        let mut s = AutoSellScheduler::new();
        s.sync(&state);
        let idx = state
            .upgrade_index(UpgradeId::new(ResourceId::Iron, UpgradeKind::AutoSellSpeed))
            .unwrap();
        state.upgrades[idx].set_count(4);
        s.sync(&state);
        assert_eq!(s.interval(ResourceId::Iron), Some(6.0));
    }

    #[test]
    fn tick_sells_after_interval() {
        let mut state = with_iron_seller();
        state.resources[0].count = 40.0;
        let mut s = AutoSellScheduler::new();
        s.sync(&state);

        assert!(s.tick(&mut state, 9.5).is_empty());
        assert!((state.resources[0].count - 40.0).abs() < f64::EPSILON);

        let sales = s.tick(&mut state, 0.5);
        assert_eq!(sales, vec![AutoSale { resource: ResourceId::Iron, cash: 40.0 }]);
        assert!((state.money - 40.0).abs() < 1e-9);
        assert_eq!(state.stats.clicks.sell, 0);
    }

    #[test]
    fn long_tick_sells_once() {
        let mut state = with_iron_seller();
        state.resources[0].count = 5.0;
        let mut s = AutoSellScheduler::new();
        s.sync(&state);
        let sales = s.tick(&mut state, 35.0);
        assert_eq!(sales.len(), 1);
        // 35 % 10 = 5 seconds carried over
        state.resources[0].count = 1.0;
        assert_eq!(s.tick(&mut state, 5.0).len(), 1);
    }

    #[test]
    fn stop_all_clears_everything() {
        let mut s = AutoSellScheduler::new();
        for id in ResourceId::ALL {
            s.start(id, 3.0);
        }
        s.stop_all();
        assert_eq!(s.running_count(), 0);
    }
}
