//! Actuator command sent back to the server every tick.

/// Number of focus sensor directions in a command.
pub const FOCUS_SENSORS: usize = 5;

/// Default focus sensor directions, in degrees.
pub const DEFAULT_FOCUS: [f64; FOCUS_SENSORS] = [-90.0, -45.0, 0.0, 45.0, 90.0];

/// The seven-key actuator command.
///
/// Held across ticks and mutated in place by the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionCommand {
    /// Throttle, 0 to 1.
    pub accel: f64,
    /// Brake, 0 to 1.
    pub brake: f64,
    /// Clutch, 0 to 1.
    pub clutch: f64,
    /// Selected gear: -1 reverse, 0 neutral, 1..=6 forward.
    pub gear: i32,
    /// Steering, -1 (full right) to 1 (full left).
    pub steer: f64,
    /// Focus sensor directions in degrees.
    pub focus: [f64; FOCUS_SENSORS],
    /// 1 asks the server to restart the race.
    pub meta: i32,
}

impl Default for ActionCommand {
    fn default() -> Self {
        Self {
            accel: 0.2,
            brake: 0.0,
            clutch: 0.0,
            gear: 1,
            steer: 0.0,
            focus: DEFAULT_FOCUS,
            meta: 0,
        }
    }
}

impl ActionCommand {
    /// Copy of this command with the restart flag raised.
    pub fn with_restart_request(self) -> Self {
        Self { meta: 1, ..self }
    }

    /// True when every actuator lies in its physical range.
    pub fn is_within_limits(&self) -> bool {
        let unit = 0.0..=1.0;
        unit.contains(&self.accel)
            && unit.contains(&self.brake)
            && unit.contains(&self.clutch)
            && (-1.0..=1.0).contains(&self.steer)
            && (-1..=6).contains(&self.gear)
    }

    /// Encode this command in wire format.
    pub fn to_wire(&self) -> String {
        crate::encode::encode_to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_within_limits() {
        let action = ActionCommand::default();
        assert!(action.is_within_limits());
        assert_eq!(action.gear, 1);
        assert_eq!(action.meta, 0);
    }

    #[test]
    fn test_restart_request_only_touches_meta() {
        let action = ActionCommand::default();
        let restart = action.with_restart_request();
        assert_eq!(restart.meta, 1);
        assert_eq!(ActionCommand { meta: 0, ..restart }, action);
    }

    #[test]
    fn test_out_of_range_steer_detected() {
        let action = ActionCommand {
            steer: 1.5,
            ..ActionCommand::default()
        };
        assert!(!action.is_within_limits());
    }
}
