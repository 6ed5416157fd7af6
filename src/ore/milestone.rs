//! Lifetime-mined milestones.
//!
//! Each tier has five thresholds. Crossing one grants a production
//! multiplier, and the multipliers of every achieved threshold stack.

use super::state::{ResourceId, RESOURCE_COUNT};

/// Lifetime mined amounts that award a milestone.
pub const MILESTONE_THRESHOLDS: [f64; 5] = [100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0];

/// Multiplier granted by each threshold, same order.
pub const MILESTONE_MULTIPLIERS: [f64; 5] = [1.2, 1.5, 1.8, 2.0, 2.5];

pub const TIER_COUNT: usize = MILESTONE_THRESHOLDS.len();

/// Achieved flags per tier. Flags never clear within an epoch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MilestoneState {
    achieved: [[bool; TIER_COUNT]; RESOURCE_COUNT],
}

impl MilestoneState {
    pub fn achieved(&self, id: ResourceId) -> [bool; TIER_COUNT] {
        self.achieved[id.index()]
    }

    /// Restore flags from a save. Missing trailing flags stay unset.
    pub fn set_achieved(&mut self, id: ResourceId, flags: &[bool]) {
        for (slot, &flag) in self.achieved[id.index()].iter_mut().zip(flags) {
            *slot = flag;
        }
    }

    /// Product of every achieved tier's multiplier.
    pub fn multiplier(&self, id: ResourceId) -> f64 {
        self.achieved[id.index()]
            .iter()
            .zip(MILESTONE_MULTIPLIERS)
            .filter(|(done, _)| **done)
            .map(|(_, m)| m)
            .product()
    }

    /// Achieved (tier, threshold) pairs across all tiers.
    pub fn achieved_count(&self) -> usize {
        self.achieved.iter().flatten().filter(|&&done| done).count()
    }

    /// Mark every threshold `mined` has reached. Returns the thresholds that
    /// were newly achieved by this call.
    pub fn recompute(&mut self, id: ResourceId, mined: f64) -> Vec<f64> {
        let flags = &mut self.achieved[id.index()];
        let mut newly = Vec::new();
        for (flag, threshold) in flags.iter_mut().zip(MILESTONE_THRESHOLDS) {
            if !*flag && mined >= threshold {
                *flag = true;
                newly.push(threshold);
            }
        }
        newly
    }
}
