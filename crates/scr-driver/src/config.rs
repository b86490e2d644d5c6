//! Control tuning.
//!
//! All gains, thresholds and fixed constants of the control law live here
//! and are handed to the driver at construction. Every field has a default,
//! so a YAML file only needs to name what it overrides:
//!
//! ```yaml
//! dt: 0.02
//! longitudinal: { kp: 0.4, ki: 0.05, kd: 0.0, target: 180.0 }
//! braking:
//!   cornering_speed: 90.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use openracing_scr_protocol::{DEFAULT_RANGEFINDER_ANGLES, RANGEFINDER_SENSORS};

use crate::error::{ConfigError, ConfigResult};
use crate::{GearboxConfig, PidGains};

/// Scale and bound applied to a controller output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GainSchedule {
    pub scale: f64,
    pub limit: f64,
}

impl Default for GainSchedule {
    fn default() -> Self {
        Self {
            scale: 1.0,
            limit: 1.1,
        }
    }
}

/// Brake and clutch arbitration thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrakingConfig {
    /// Steering magnitude that counts as hard cornering.
    pub cornering_steer: f64,
    /// Speed (km/h) from which hard cornering triggers braking.
    pub cornering_speed: f64,
    /// Speed (km/h) from which the clutch is ramped on straights.
    pub high_speed: f64,
    pub clutch_step: f64,
    pub brake_step: f64,
}

impl Default for BrakingConfig {
    fn default() -> Self {
        Self {
            cornering_steer: 0.04,
            cornering_speed: 100.0,
            high_speed: 150.0,
            clutch_step: 0.001,
            brake_step: 0.0001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    /// Simulation step used for dead-reckoning, seconds.
    pub dt: f64,
    /// Track width used to normalise the lateral correction.
    pub road_width: f64,
    /// Below this forward-sensor reading the curvature term is skipped.
    pub forward_sensor_epsilon: f64,
    pub lateral: PidGains,
    pub longitudinal: PidGains,
    pub steer_schedule: GainSchedule,
    pub throttle_schedule: GainSchedule,
    pub braking: BrakingConfig,
    /// Throttle held while the car is off the track.
    pub off_track_accel: f64,
    /// Backward offset applied to the lap time after a discontinuity.
    pub lap_reset_offset: f64,
    pub gearbox: GearboxConfig,
    /// Rangefinder directions requested at identification, degrees.
    pub rangefinder_angles: Vec<f64>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            road_width: 20.0,
            forward_sensor_epsilon: 1e-6,
            lateral: PidGains::LATERAL,
            longitudinal: PidGains::LONGITUDINAL,
            steer_schedule: GainSchedule::default(),
            throttle_schedule: GainSchedule::default(),
            braking: BrakingConfig::default(),
            off_track_accel: 0.3,
            lap_reset_offset: 0.022,
            gearbox: GearboxConfig::default(),
            rangefinder_angles: DEFAULT_RANGEFINDER_ANGLES.to_vec(),
        }
    }
}

impl ControlConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] on malformed YAML or unknown keys and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`ControlConfig::from_yaml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading control config");
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Check ranges and the consistency of the shift tables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("dt", self.dt)?;
        positive("road_width", self.road_width)?;
        positive("forward_sensor_epsilon", self.forward_sensor_epsilon)?;
        positive("steer_schedule.limit", self.steer_schedule.limit)?;
        positive("throttle_schedule.limit", self.throttle_schedule.limit)?;
        finite("steer_schedule.scale", self.steer_schedule.scale)?;
        finite("throttle_schedule.scale", self.throttle_schedule.scale)?;
        finite("lap_reset_offset", self.lap_reset_offset)?;

        if !self.lateral.is_finite() {
            return Err(ConfigError::invalid("lateral", "gains must be finite"));
        }
        if !self.longitudinal.is_finite() {
            return Err(ConfigError::invalid("longitudinal", "gains must be finite"));
        }

        unit("off_track_accel", self.off_track_accel)?;
        unit("braking.clutch_step", self.braking.clutch_step)?;
        unit("braking.brake_step", self.braking.brake_step)?;
        unit("braking.cornering_steer", self.braking.cornering_steer)?;
        finite("braking.cornering_speed", self.braking.cornering_speed)?;
        finite("braking.high_speed", self.braking.high_speed)?;
        unit("gearbox.launch_clutch", self.gearbox.launch_clutch)?;
        unit("gearbox.clutch_release_step", self.gearbox.clutch_release_step)?;

        self.validate_shift_tables()?;

        if self.rangefinder_angles.len() != RANGEFINDER_SENSORS {
            return Err(ConfigError::invalid(
                "rangefinder_angles",
                format!(
                    "expected {RANGEFINDER_SENSORS} angles, got {}",
                    self.rangefinder_angles.len()
                ),
            ));
        }
        if self
            .rangefinder_angles
            .iter()
            .any(|angle| !(-180.0..=180.0).contains(angle))
        {
            return Err(ConfigError::invalid(
                "rangefinder_angles",
                "angles must lie within [-180, 180] degrees",
            ));
        }
        Ok(())
    }

    fn validate_shift_tables(&self) -> ConfigResult<()> {
        let up = &self.gearbox.upshift_rpm;
        let down = &self.gearbox.downshift_rpm;

        if up.iter().chain(down.iter()).any(|rpm| !rpm.is_finite()) {
            return Err(ConfigError::invalid("gearbox", "shift points must be finite"));
        }
        if up.windows(2).any(|pair| matches!(pair, [a, b] if b < a)) {
            return Err(ConfigError::invalid(
                "gearbox.upshift_rpm",
                "shift points must not decrease",
            ));
        }
        if down.windows(2).any(|pair| matches!(pair, [a, b] if b < a)) {
            return Err(ConfigError::invalid(
                "gearbox.downshift_rpm",
                "shift points must not decrease",
            ));
        }
        // Landing in gear n+1 after an upshift must not immediately allow a downshift.
        if up
            .iter()
            .zip(down.iter().skip(1))
            .any(|(upshift, next_down)| next_down >= upshift)
        {
            return Err(ConfigError::invalid(
                "gearbox",
                "each upshift point must exceed the next gear's downshift point",
            ));
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} is not finite")))
    }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn unit(field: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must lie in [0, 1]")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_default_config_is_valid() -> TestResult {
        ControlConfig::default().validate()?;
        Ok(())
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> TestResult {
        let config = ControlConfig::from_yaml_str(
            "dt: 0.02\nlongitudinal: { kp: 0.4, ki: 0.05, kd: 0.0, target: 180.0 }\nbraking:\n  cornering_speed: 90.0\n",
        )?;
        assert_eq!(config.longitudinal.target, 180.0);
        assert_eq!(config.braking.cornering_speed, 90.0);
        assert_eq!(config.braking.high_speed, 150.0);
        assert_eq!(config.lateral, PidGains::LATERAL);
        assert_eq!(config.gearbox, GearboxConfig::default());
        Ok(())
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ControlConfig::from_yaml_str("target_sped: 200\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_negative_dt_rejected() {
        let result = ControlConfig::from_yaml_str("dt: -0.01\n");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "dt", .. })
        ));
    }

    #[test]
    fn test_off_track_accel_out_of_range() {
        let config = ControlConfig {
            off_track_accel: 1.5,
            ..ControlConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "off_track_accel",
                ..
            })
        ));
    }

    #[test]
    fn test_overlapping_shift_points_rejected() {
        let mut config = ControlConfig::default();
        config.gearbox.downshift_rpm = [0.0, 5500.0, 5500.0, 5500.0, 5500.0, 5500.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "gearbox", .. })
        ));
    }

    #[test]
    fn test_wrong_angle_count_rejected() {
        let config = ControlConfig {
            rangefinder_angles: vec![0.0; 5],
            ..ControlConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "rangefinder_angles",
                ..
            })
        ));
    }
}
