//! PID controller primitive.
//!
//! Each controller tracks a fixed target. Every call to [`Pid::output`]
//! accumulates the error into the integral term and returns a bounded
//! correction.

use serde::{Deserialize, Serialize};

/// Gains and set-point of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub target: f64,
}

impl PidGains {
    /// Lateral controller: hold the predicted edge distance at 1 (track axis).
    pub const LATERAL: Self = Self {
        kp: 0.2,
        ki: 0.002,
        kd: 0.01,
        target: 1.0,
    };

    /// Longitudinal controller: drive speed towards 300 km/h.
    pub const LONGITUDINAL: Self = Self {
        kp: 0.5,
        ki: 0.09,
        kd: 0.0,
        target: 300.0,
    };

    pub fn is_finite(&self) -> bool {
        self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite() && self.target.is_finite()
    }
}

/// Discrete PID controller, one step per tick.
///
/// # RT-Safety
///
/// - All operations are O(1) and allocation-free
/// - Output is bounded by the caller-supplied limit
#[derive(Debug, Clone)]
pub struct Pid {
    gains: PidGains,

    /// Sum of errors over all calls
    integral: f64,

    /// Error seen by the previous call, for the derivative term
    prev_error: Option<f64>,

    /// Number of calls so far
    sample_count: u64,
}

impl Pid {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            prev_error: None,
            sample_count: 0,
        }
    }

    /// Compute the correction for `measurement`.
    ///
    /// `error = target - measurement`; the derivative is the change in error
    /// since the previous call (zero on the first). The raw PID sum is
    /// multiplied by `scale` and clamped to `[-limit, limit]`.
    pub fn output(&mut self, measurement: f64, scale: f64, limit: f64) -> f64 {
        let error = self.gains.target - measurement;
        self.integral += error;
        let derivative = self.prev_error.map_or(0.0, |prev| error - prev);
        self.prev_error = Some(error);
        self.sample_count = self.sample_count.saturating_add(1);

        let raw = self.gains.kp * error + self.gains.ki * self.integral + self.gains.kd * derivative;
        let limit = limit.abs();
        (scale * raw).clamp(-limit, limit)
    }

    #[inline]
    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    #[inline]
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }
}
