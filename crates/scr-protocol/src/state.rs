//! Typed projection of a telemetry record.
//!
//! The driver never reads the loosely typed [`TelemetryRecord`] directly. A
//! record is first projected into a [`CarState`], which fails fast with a
//! named [`StateError`] when a required field is absent or malformed.

use tracing::debug;

use crate::{FieldValue, StateError, TelemetryRecord};

/// Minimum number of track rangefinder readings the driver relies on.
pub const MIN_TRACK_SENSORS: usize = 13;

/// Car and track state for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CarState {
    /// Angle between the car heading and the track axis, radians.
    pub angle: f64,
    /// Lateral position: 0 on the axis, ±1 on the edges.
    pub track_pos: f64,
    /// Longitudinal speed, km/h.
    pub speed_x: f64,
    /// Track edge rangefinder readings, metres.
    pub track: Vec<f64>,
    pub gear: i32,
    pub rpm: f64,
    /// Time elapsed in the current lap, seconds.
    pub cur_lap_time: f64,
    pub race_pos: i32,

    pub speed_y: Option<f64>,
    pub speed_z: Option<f64>,
    pub dist_from_start: Option<f64>,
    pub dist_raced: Option<f64>,
    pub fuel: Option<f64>,
    pub damage: Option<f64>,
    pub last_lap_time: Option<f64>,
    pub z: Option<f64>,
    pub wheel_spin_vel: Option<Vec<f64>>,
    pub opponents: Option<Vec<f64>>,
    pub focus: Option<Vec<f64>>,
}

impl CarState {
    /// Project a decoded record.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when a required field is missing, has the wrong
    /// shape, is not finite, or when `track` has fewer than
    /// [`MIN_TRACK_SENSORS`] readings.
    pub fn from_record(record: &TelemetryRecord) -> Result<Self, StateError> {
        let track = required_sequence(record, "track")?;
        if track.len() < MIN_TRACK_SENSORS {
            return Err(StateError::TrackTooShort {
                len: track.len(),
                min: MIN_TRACK_SENSORS,
            });
        }
        if track.iter().any(|reading| !reading.is_finite()) {
            return Err(StateError::NonFinite("track"));
        }

        Ok(Self {
            angle: required_scalar(record, "angle")?,
            track_pos: required_scalar(record, "trackPos")?,
            speed_x: required_scalar(record, "speedX")?,
            track: track.to_vec(),
            gear: whole(required_scalar(record, "gear")?),
            rpm: required_scalar(record, "rpm")?,
            cur_lap_time: required_scalar(record, "curLapTime")?,
            race_pos: whole(required_scalar(record, "racePos")?),

            speed_y: optional_scalar(record, "speedY"),
            speed_z: optional_scalar(record, "speedZ"),
            dist_from_start: optional_scalar(record, "distFromStart"),
            dist_raced: optional_scalar(record, "distRaced"),
            fuel: optional_scalar(record, "fuel"),
            damage: optional_scalar(record, "damage"),
            last_lap_time: optional_scalar(record, "lastLapTime"),
            z: optional_scalar(record, "z"),
            wheel_spin_vel: optional_sequence(record, "wheelSpinVel"),
            opponents: optional_sequence(record, "opponents"),
            focus: optional_sequence(record, "focus"),
        })
    }

    /// Rangefinder reading at `index`, if the server sent that many.
    pub fn rangefinder(&self, index: usize) -> Option<f64> {
        self.track.get(index).copied()
    }

    /// True while the car is between the track edges.
    pub fn is_on_track(&self) -> bool {
        self.track_pos.abs() < 1.0
    }
}

impl TryFrom<&TelemetryRecord> for CarState {
    type Error = StateError;

    fn try_from(record: &TelemetryRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

fn required_scalar(record: &TelemetryRecord, field: &'static str) -> Result<f64, StateError> {
    let value = match record.get(field) {
        None => return Err(StateError::MissingField(field)),
        Some(FieldValue::Scalar(value)) => *value,
        Some(_) => {
            return Err(StateError::WrongShape {
                field,
                expected: "number",
            });
        }
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StateError::NonFinite(field))
    }
}

fn required_sequence<'r>(
    record: &'r TelemetryRecord,
    field: &'static str,
) -> Result<&'r [f64], StateError> {
    match record.get(field) {
        None => Err(StateError::MissingField(field)),
        Some(FieldValue::Sequence(values)) => Ok(values),
        Some(_) => Err(StateError::WrongShape {
            field,
            expected: "sequence of numbers",
        }),
    }
}

fn optional_scalar(record: &TelemetryRecord, field: &str) -> Option<f64> {
    let value = record.get(field)?;
    let scalar = value.as_scalar();
    if scalar.is_none() {
        debug!(field, %value, "Ignoring malformed optional telemetry field");
    }
    scalar
}

fn optional_sequence(record: &TelemetryRecord, field: &str) -> Option<Vec<f64>> {
    match record.get(field)? {
        FieldValue::Sequence(values) => Some(values.clone()),
        FieldValue::Scalar(value) => Some(vec![*value]),
        value @ FieldValue::Text(_) => {
            debug!(field, %value, "Ignoring malformed optional telemetry field");
            None
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "gear and race position are small whole numbers sent as floats"
)]
fn whole(value: f64) -> i32 {
    value.round() as i32
}
