//! Which ore tiers the player has bought access to.

use super::state::{ResourceId, RESOURCE_COUNT};

/// Money needed to open a tier. Iron is free and always open.
///
/// The first tiers step up x4, later ones x6 to x11.
pub fn unlock_cost(id: ResourceId) -> f64 {
    match id {
        ResourceId::Iron => 0.0,
        ResourceId::Copper => 200_000.0,
        ResourceId::Nickel => 800_000.0,
        ResourceId::Bronze => 3_200_000.0,
        ResourceId::Silver => 12_800_000.0,
        ResourceId::Cobalt => 76_800_000.0,
        ResourceId::Gold => 614_400_000.0,
        ResourceId::Palladium => 5_529_600_000.0,
        ResourceId::Platinum => 55_296_000_000.0,
        ResourceId::Titanium => 608_256_000_000.0,
        ResourceId::Adamantium => 6_690_816_000_000.0,
    }
}

/// Unlock flags for every tier except iron.
///
/// Flags only go from locked to unlocked during an epoch; a reset replaces
/// the whole ledger.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnlockState {
    flags: [bool; RESOURCE_COUNT],
}

impl UnlockState {
    pub fn is_unlocked(&self, id: ResourceId) -> bool {
        id == ResourceId::Iron || self.flags[id.index()]
    }

    /// Mark a tier unlocked. Returns false if it already was.
    pub fn set_unlocked(&mut self, id: ResourceId) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.flags[id.index()] = true;
        true
    }

    /// Unlocked tiers other than iron, in tier order.
    pub fn unlocked(&self) -> Vec<ResourceId> {
        ResourceId::ALL
            .iter()
            .copied()
            .filter(|&id| id != ResourceId::Iron && self.flags[id.index()])
            .collect()
    }

    /// Next tier still locked, if any.
    pub fn next_locked(&self) -> Option<ResourceId> {
        ResourceId::ALL.iter().copied().find(|&id| !self.is_unlocked(id))
    }
}
