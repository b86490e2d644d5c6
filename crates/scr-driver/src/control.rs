//! Per-tick control loop.

use tracing::{debug, trace, warn};

use openracing_scr_protocol::{ActionCommand, CarState};

use crate::{ControlConfig, ControllerMemory};

/// Rangefinder index pointing left of the car axis.
pub const LEFT_SENSOR: usize = 6;
/// Rangefinder index pointing straight ahead.
pub const CENTER_SENSOR: usize = 9;
/// Rangefinder index pointing right of the car axis.
pub const RIGHT_SENSOR: usize = 12;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// First tick of the session: lap time recorded, action untouched.
    Primed,
    /// Hard cornering at speed: steering, brake and clutch updated, the rest
    /// of the tick skipped.
    HardCornering,
    /// Full tick.
    Driven { off_track: bool },
}

impl TickOutcome {
    pub fn is_off_track(&self) -> bool {
        matches!(self, TickOutcome::Driven { off_track: true })
    }
}

/// Distance from the track edge in normalised track-width units.
pub fn edge_distance(track_pos: f64) -> f64 {
    if track_pos >= 0.0 {
        (1.0 - track_pos).abs()
    } else {
        (-1.0 + track_pos).abs()
    }
}

/// Run one control tick, mutating `action` and `memory`.
pub fn step(
    state: &CarState,
    memory: &mut ControllerMemory,
    action: &mut ActionCommand,
    config: &ControlConfig,
) -> TickOutcome {
    let Some(prev_lap_time) = memory.prev_lap_time else {
        memory.prev_lap_time = Some(state.cur_lap_time);
        debug!(lap_time = state.cur_lap_time, "First tick, controller primed");
        return TickOutcome::Primed;
    };

    action.steer = steering(state, memory, config);

    let braking = &config.braking;
    if action.steer.abs() >= braking.cornering_steer && state.speed_x >= braking.cornering_speed {
        action.clutch = ramp(action.clutch, braking.clutch_step);
        action.brake = ramp(action.brake, braking.brake_step);
        trace!(
            steer = action.steer,
            speed = state.speed_x,
            brake = action.brake,
            "Hard cornering"
        );
        return TickOutcome::HardCornering;
    } else if state.speed_x >= braking.high_speed {
        action.clutch = ramp(action.clutch, braking.clutch_step);
        action.brake = 0.0;
    } else {
        action.clutch = 0.0;
        action.brake = 0.0;
    }

    let off_track = !state.is_on_track();
    if off_track {
        action.accel = config.off_track_accel;
        warn!(track_pos = state.track_pos, "Off track");
    } else {
        let schedule = config.throttle_schedule;
        let correction = memory
            .longitudinal
            .output(state.speed_x, schedule.scale, schedule.limit);
        action.accel = (action.accel + correction).clamp(0.0, 1.0);
    }

    action.gear = config.gearbox.select_gear(state.gear, state.rpm);
    config.gearbox.apply_clutch(action);

    memory.prev_lap_time = Some(if state.cur_lap_time > prev_lap_time {
        state.cur_lap_time
    } else {
        debug!(
            lap_time = state.cur_lap_time,
            prev_lap_time, "Lap time did not advance, assuming restart"
        );
        state.cur_lap_time - config.lap_reset_offset
    });

    TickOutcome::Driven { off_track }
}

fn steering(state: &CarState, memory: &mut ControllerMemory, config: &ControlConfig) -> f64 {
    let predicted = edge_distance(state.track_pos) + state.speed_x * config.dt * state.angle.sin();
    let schedule = config.steer_schedule;
    let correction = memory
        .lateral
        .output(predicted, schedule.scale, schedule.limit);
    let anticipation = curvature_term(state, config);
    (-(correction - anticipation)).clamp(-1.0, 1.0)
}

/// Lateral offset plus left/right rangefinder asymmetry around the forward sensor.
fn curvature_term(state: &CarState, config: &ControlConfig) -> f64 {
    let lateral = state.track_pos / config.road_width;

    let (Some(left), Some(center), Some(right)) = (
        state.rangefinder(LEFT_SENSOR),
        state.rangefinder(CENTER_SENSOR),
        state.rangefinder(RIGHT_SENSOR),
    ) else {
        return lateral;
    };
    if center.abs() < config.forward_sensor_epsilon {
        trace!(center, "Forward sensor blocked, skipping curvature term");
        return lateral;
    }

    let curvature = (left - right) / (2.0 * center);
    if curvature.is_finite() {
        lateral + curvature
    } else {
        lateral
    }
}

fn ramp(value: f64, step: f64) -> f64 {
    (value + step).clamp(0.0, 1.0)
}

/// Session-scoped driver: configuration, controller memory and the action
/// that is mutated every tick.
#[derive(Debug, Clone)]
pub struct Driver {
    config: ControlConfig,
    memory: ControllerMemory,
    action: ActionCommand,
    ticks: u64,
}

impl Driver {
    pub fn new(config: ControlConfig) -> Self {
        let memory = ControllerMemory::new(&config);
        Self {
            config,
            memory,
            action: ActionCommand::default(),
            ticks: 0,
        }
    }

    /// Run one tick and return its outcome; the new action is in [`Driver::action`].
    pub fn drive(&mut self, state: &CarState) -> TickOutcome {
        self.ticks = self.ticks.saturating_add(1);
        step(state, &mut self.memory, &mut self.action, &self.config)
    }

    pub fn action(&self) -> &ActionCommand {
        &self.action
    }

    pub fn memory(&self) -> &ControllerMemory {
        &self.memory
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Rangefinder directions to request at identification.
    pub fn rangefinder_angles(&self) -> &[f64] {
        &self.config.rangefinder_angles
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
