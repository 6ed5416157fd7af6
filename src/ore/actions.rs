//! Player commands and the numeric action IDs a UI registers for them.
//!
//! A front end registers one ID per clickable target and hands it back on
//! click; `Command::from_action_id` turns it into a typed command that
//! `Session::dispatch` executes.

use super::logic::BuyQuantity;
use super::prestige::CoreUpgradeKind;
use super::state::{ResourceId, RESOURCE_COUNT};
use super::upgrade::{UpgradeId, UpgradeKind};

// ── Per-tier actions (base + tier index 0..11) ──────────────────
pub const MINE_BASE: u16 = 100;
pub const SELL_BASE: u16 = 200;
pub const UNLOCK_BASE: u16 = 300;
pub const AUTO_SELL_ON_BASE: u16 = 400;
pub const AUTO_SELL_OFF_BASE: u16 = 450;

// ── Prestige ────────────────────────────────────────────────────
pub const PRESTIGE: u16 = 500;
/// base + core upgrade index 0..3
pub const BUY_CORE_BASE: u16 = 600;

// ── Misc ────────────────────────────────────────────────────────
pub const SAVE: u16 = 900;

// ── Upgrade purchase (base + tier * 4 + kind) ───────────────────
pub const BUY_ONE_BASE: u16 = 1000;
pub const BUY_MAX_BASE: u16 = 1100;

const UPGRADE_SLOTS: u16 = (RESOURCE_COUNT * UpgradeKind::ALL.len()) as u16;

/// Everything a player can ask the engine to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Mine(ResourceId),
    Sell(ResourceId),
    BuyUpgrade(UpgradeId, BuyQuantity),
    Unlock(ResourceId),
    /// Set the tier's auto-seller switch.
    ToggleAutoSell(ResourceId, bool),
    Prestige,
    BuyCore(CoreUpgradeKind),
    Save,
}

fn tier(id: u16, base: u16) -> Option<ResourceId> {
    ResourceId::from_index(id.checked_sub(base)? as usize)
}

fn upgrade_slot(id: u16, base: u16) -> Option<UpgradeId> {
    let slot = id.checked_sub(base)?;
    if slot >= UPGRADE_SLOTS {
        return None;
    }
    let per_tier = UpgradeKind::ALL.len() as u16;
    let resource = ResourceId::from_index((slot / per_tier) as usize)?;
    let kind = UpgradeKind::ALL[(slot % per_tier) as usize];
    Some(UpgradeId::new(resource, kind))
}

fn upgrade_offset(id: UpgradeId) -> u16 {
    let kind = UpgradeKind::ALL
        .iter()
        .position(|&k| k == id.kind)
        .unwrap_or_default();
    (id.resource.index() * UpgradeKind::ALL.len() + kind) as u16
}

impl Command {
    /// Decode a registered action ID. Unknown IDs give `None`.
    pub fn from_action_id(id: u16) -> Option<Command> {
        match id {
            PRESTIGE => Some(Command::Prestige),
            SAVE => Some(Command::Save),
            MINE_BASE..=199 => tier(id, MINE_BASE).map(Command::Mine),
            SELL_BASE..=299 => tier(id, SELL_BASE).map(Command::Sell),
            UNLOCK_BASE..=399 => tier(id, UNLOCK_BASE).map(Command::Unlock),
            AUTO_SELL_ON_BASE..=449 => {
                tier(id, AUTO_SELL_ON_BASE).map(|r| Command::ToggleAutoSell(r, true))
            }
            AUTO_SELL_OFF_BASE..=499 => {
                tier(id, AUTO_SELL_OFF_BASE).map(|r| Command::ToggleAutoSell(r, false))
            }
            BUY_CORE_BASE..=699 => CoreUpgradeKind::ALL
                .get((id - BUY_CORE_BASE) as usize)
                .map(|&k| Command::BuyCore(k)),
            BUY_ONE_BASE..=1099 => {
                upgrade_slot(id, BUY_ONE_BASE).map(|u| Command::BuyUpgrade(u, BuyQuantity::One))
            }
            BUY_MAX_BASE..=1199 => {
                upgrade_slot(id, BUY_MAX_BASE).map(|u| Command::BuyUpgrade(u, BuyQuantity::Max))
            }
            _ => None,
        }
    }

    /// The action ID a UI should register for this command. Exact-count
    /// purchases have no ID.
    pub fn action_id(&self) -> Option<u16> {
        let id = match *self {
            Command::Mine(r) => MINE_BASE + r.index() as u16,
            Command::Sell(r) => SELL_BASE + r.index() as u16,
            Command::Unlock(r) => UNLOCK_BASE + r.index() as u16,
            Command::ToggleAutoSell(r, true) => AUTO_SELL_ON_BASE + r.index() as u16,
            Command::ToggleAutoSell(r, false) => AUTO_SELL_OFF_BASE + r.index() as u16,
            Command::Prestige => PRESTIGE,
            Command::BuyCore(kind) => {
                let idx = CoreUpgradeKind::ALL.iter().position(|&k| k == kind)?;
                BUY_CORE_BASE + idx as u16
            }
            Command::Save => SAVE,
            Command::BuyUpgrade(u, BuyQuantity::One) => BUY_ONE_BASE + upgrade_offset(u),
            Command::BuyUpgrade(u, BuyQuantity::Max) => BUY_MAX_BASE + upgrade_offset(u),
            Command::BuyUpgrade(_, BuyQuantity::Units(_)) => return None,
        };
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_tier_actions() {
        assert_eq!(Command::from_action_id(100), Some(Command::Mine(ResourceId::Iron)));
        assert_eq!(Command::from_action_id(210), Some(Command::Sell(ResourceId::Adamantium)));
        assert_eq!(Command::from_action_id(301), Some(Command::Unlock(ResourceId::Copper)));
        assert_eq!(Command::from_action_id(111), None);
    }

    #[test]
    fn decode_auto_sell_switches() {
        assert_eq!(
            Command::from_action_id(402),
            Some(Command::ToggleAutoSell(ResourceId::Nickel, true))
        );
        assert_eq!(
            Command::from_action_id(450),
            Some(Command::ToggleAutoSell(ResourceId::Iron, false))
        );
        assert_eq!(Command::from_action_id(411), None);
        assert_eq!(Command::from_action_id(461), None);
    }

    #[test]
    fn decode_upgrade_actions() {
        // copper (1) * 4 + AutoRate (1)
        assert_eq!(
            Command::from_action_id(1005),
            Some(Command::BuyUpgrade(
                UpgradeId::new(ResourceId::Copper, UpgradeKind::AutoRate),
                BuyQuantity::One
            ))
        );
        assert_eq!(
            Command::from_action_id(1100),
            Some(Command::BuyUpgrade(
                UpgradeId::new(ResourceId::Iron, UpgradeKind::ClickPower),
                BuyQuantity::Max
            ))
        );
        assert_eq!(Command::from_action_id(1044), None);
    }

    #[test]
    fn decode_prestige_actions() {
        assert_eq!(Command::from_action_id(500), Some(Command::Prestige));
        assert_eq!(
            Command::from_action_id(602),
            Some(Command::BuyCore(CoreUpgradeKind::AutoMineSpeed))
        );
        assert_eq!(Command::from_action_id(603), None);
        assert_eq!(Command::from_action_id(0), None);
    }

    #[test]
    fn every_registered_id_decodes_back() {
        let mut commands = vec![Command::Prestige, Command::Save];
        for id in ResourceId::ALL {
            commands.push(Command::Mine(id));
            commands.push(Command::Sell(id));
            commands.push(Command::Unlock(id));
            commands.push(Command::ToggleAutoSell(id, true));
            commands.push(Command::ToggleAutoSell(id, false));
            for kind in UpgradeKind::ALL {
                let u = UpgradeId::new(id, kind);
                commands.push(Command::BuyUpgrade(u, BuyQuantity::One));
                commands.push(Command::BuyUpgrade(u, BuyQuantity::Max));
            }
        }
        for kind in CoreUpgradeKind::ALL {
            commands.push(Command::BuyCore(kind));
        }
        for cmd in commands {
            let id = cmd.action_id().unwrap();
            assert_eq!(Command::from_action_id(id), Some(cmd), "id {}", id);
        }
    }

    #[test]
    fn exact_count_has_no_action_id() {
        let u = UpgradeId::new(ResourceId::Iron, UpgradeKind::ClickPower);
        assert_eq!(Command::BuyUpgrade(u, BuyQuantity::Units(5)).action_id(), None);
    }
}
