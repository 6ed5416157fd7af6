//! Balance simulator for Ore Idle.
//! Run with: cargo test simulate_greedy -- --nocapture

use crate::format::{format_duration, format_number};

use super::logic::{self, BuyQuantity};
use super::prestige::{self, PrestigeStatus};
use super::state::{GameState, ResourceId};
use super::unlock::unlock_cost;
use super::upgrade::{UpgradeId, UpgradeKind, AUTO_RATE_PER_UNIT, CLICK_POWER_PER_UNIT};

const CLICKS_PER_SECOND: u32 = 5;

/// Upgrades paying back slower than this wait while the next tier is saved for.
const MAX_PAYBACK_SECS: f64 = 600.0;

/// What to do with the money on hand.
enum Purchase {
    Unlock(ResourceId),
    Upgrade(UpgradeId),
}

/// Unlocked tier whose click is worth the most.
fn click_target(state: &GameState) -> ResourceId {
    ResourceId::ALL
        .into_iter()
        .filter(|&id| state.is_unlocked(id))
        .max_by(|&a, &b| {
            let value = |id| state.effective_per_click(id) * state.effective_sell_price(id);
            value(a).total_cmp(&value(b))
        })
        .unwrap_or(ResourceId::Iron)
}

/// Unlock the next tier when affordable, otherwise the upgrade with the
/// shortest payback.
fn find_best_purchase(state: &GameState, target: ResourceId) -> Option<Purchase> {
    let next = state.unlocks.next_locked();
    if let Some(id) = next {
        if state.money >= unlock_cost(id) {
            return Some(Purchase::Unlock(id));
        }
    }

    let mut best: Option<(f64, UpgradeId)> = None;
    for u in &state.upgrades {
        let id = u.id.resource;
        if !state.is_unlocked(id) || u.is_maxed() || u.price > state.money {
            continue;
        }
        let value = state.milestones.multiplier(id) * state.effective_sell_price(id);
        let gain = match u.id.kind {
            UpgradeKind::ClickPower if id == target => {
                CLICK_POWER_PER_UNIT * CLICKS_PER_SECOND as f64 * value
            }
            UpgradeKind::AutoRate => AUTO_RATE_PER_UNIT * value,
            _ => continue,
        };
        let payback = u.price / gain;
        if next.is_some() && payback > MAX_PAYBACK_SECS {
            continue;
        }
        if best.as_ref().map_or(true, |(bp, _)| payback < *bp) {
            best = Some((payback, u.id));
        }
    }
    best.map(|(_, id)| Purchase::Upgrade(id))
}

fn report(state: &GameState, second: u32) {
    eprintln!("┌─── {} ─────────────────────────", format_duration(second as f64));
    eprintln!(
        "│ Money: {}  Earned: {}  Spent: {}",
        format_number(state.money),
        format_number(state.stats.earned_money),
        format_number(state.stats.spent_money)
    );
    let tiers: Vec<String> = ResourceId::ALL
        .iter()
        .filter(|&&id| state.is_unlocked(id))
        .map(|&id| {
            format!(
                "{}:{}/click {}/s x{:.2}",
                id,
                format_number(state.effective_per_click(id)),
                format_number(state.effective_per_second(id)),
                state.milestones.multiplier(id)
            )
        })
        .collect();
    eprintln!("│ {}", tiers.join("  "));
    eprintln!("│ Prestige reward now: {}", prestige::calculate_reward(state));
    eprintln!("└────────────────────────────────────");
}

/// Greedy play for `total_seconds`. Returns the state and the second each
/// tier was unlocked.
fn simulate(total_seconds: u32) -> (GameState, Vec<(ResourceId, u32)>) {
    let mut state = GameState::new();
    let mut unlocked_at = Vec::new();
    let report_times = [60, 300, 600, 1200, 1800, 3600];

    for second in 1..=total_seconds {
        let target = click_target(&state);
        for _ in 0..CLICKS_PER_SECOND {
            logic::mine(&mut state, target).unwrap();
        }
        logic::produce_all(&mut state, 1.0);
        for id in ResourceId::ALL {
            if state.is_unlocked(id) {
                logic::sell(&mut state, id, false).unwrap();
            }
        }

        // safety limit
        for _ in 0..50 {
            match find_best_purchase(&state, target) {
                Some(Purchase::Unlock(id)) => {
                    logic::attempt_unlock(&mut state, id).unwrap();
                    unlocked_at.push((id, second));
                }
                Some(Purchase::Upgrade(id)) => {
                    logic::buy_upgrade(&mut state, id, BuyQuantity::One).unwrap();
                }
                None => break,
            }
        }

        if report_times.contains(&second) {
            report(&state, second);
        }
    }
    (state, unlocked_at)
}

fn unlocked_by(unlocked_at: &[(ResourceId, u32)], id: ResourceId) -> Option<u32> {
    unlocked_at.iter().find(|(r, _)| *r == id).map(|&(_, s)| s)
}

#[test]
fn simulate_greedy() {
    let (state, unlocked_at) = simulate(3_600);
    for (id, second) in &unlocked_at {
        eprintln!("{} unlocked at {}", id, format_duration(*second as f64));
    }

    let copper = unlocked_by(&unlocked_at, ResourceId::Copper).expect("copper never unlocked");
    assert!(copper <= 15 * 60, "copper took {}s", copper);
    let nickel = unlocked_by(&unlocked_at, ResourceId::Nickel).expect("nickel never unlocked");
    assert!(nickel <= 30 * 60, "nickel took {}s", nickel);
    assert_eq!(state.prestige, PrestigeStatus::Unlocked);
    assert!(prestige::calculate_reward(&state) >= 1);
}

#[test]
fn greedy_play_keeps_books_balanced() {
    let (state, _) = simulate(900);
    let sold_value: f64 = ResourceId::ALL
        .iter()
        .map(|&id| state.stats.sold(id) * id.sell_price())
        .sum();
    let rel = (state.stats.earned_money - sold_value).abs() / sold_value.max(1.0);
    assert!(rel < 1e-9, "earned {} vs sold value {}", state.stats.earned_money, sold_value);
    let net = state.stats.earned_money - state.stats.spent_money;
    assert!((state.money - net).abs() / net.max(1.0) < 1e-9);
}
