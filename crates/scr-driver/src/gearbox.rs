//! Automatic gearbox: hysteresis shifting and clutch engagement.
//!
//! Shift points are indexed by the current gear. The upshift point of a gear
//! sits well above the downshift point of the next one, so a single rpm
//! reading can never bounce the box between two gears, and at most one gear
//! is changed per tick.

use serde::{Deserialize, Serialize};

use openracing_scr_protocol::ActionCommand;

/// Highest forward gear.
pub const TOP_GEAR: i32 = 6;

/// Shift points and clutch behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GearboxConfig {
    /// Upshift rpm for gears 1..=5.
    pub upshift_rpm: [f64; 5],
    /// Downshift rpm for gears 1..=6.
    pub downshift_rpm: [f64; 6],
    /// Clutch held in first gear (and below) for launch slip.
    pub launch_clutch: f64,
    /// Clutch released per tick in higher gears.
    pub clutch_release_step: f64,
}

impl Default for GearboxConfig {
    fn default() -> Self {
        Self {
            upshift_rpm: [5000.0, 6000.0, 6000.0, 6500.0, 7000.0],
            downshift_rpm: [0.0, 2500.0, 3000.0, 3000.0, 3500.0, 3500.0],
            launch_clutch: 0.5,
            clutch_release_step: 0.02,
        }
    }
}

impl GearboxConfig {
    /// Next gear for the current gear and engine speed.
    ///
    /// Neutral and reverse (gear < 1) always select first gear.
    pub fn select_gear(&self, gear: i32, rpm: f64) -> i32 {
        if gear < 1 {
            return 1;
        }
        let gear = gear.min(TOP_GEAR);
        let index = usize::try_from(gear.saturating_sub(1)).unwrap_or_default();

        let upshift = self.upshift_rpm.get(index).copied();
        let downshift = self.downshift_rpm.get(index).copied();

        if gear < TOP_GEAR && upshift.is_some_and(|threshold| rpm >= threshold) {
            gear.saturating_add(1)
        } else if gear > 1 && downshift.is_some_and(|threshold| rpm <= threshold) {
            gear.saturating_sub(1)
        } else {
            gear
        }
    }

    /// Set the clutch for the gear already written into `action`.
    pub fn apply_clutch(&self, action: &mut ActionCommand) {
        action.clutch = if action.gear < 2 {
            self.launch_clutch
        } else {
            (action.clutch - self.clutch_release_step).clamp(0.0, 1.0)
        };
    }
}
