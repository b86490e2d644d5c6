//! Telemetry datagram builders.
//!
//! Produces server-side wire text so protocol, driver and session tests can
//! share realistic frames without depending on each other.

/// Nineteen rangefinder readings of a straight, centred car: left and right
/// sensors mirror each other so the curvature term is zero.
pub const SYMMETRIC_TRACK: [f64; 19] = [
    7.0, 7.2, 7.7, 8.6, 10.2, 12.0, 13.6, 16.0, 22.0, 200.0, 22.0, 16.0, 13.6, 12.0, 10.2, 8.6,
    7.7, 7.2, 7.0,
];

/// Builder for one telemetry datagram.
#[derive(Debug, Clone)]
pub struct TelemetryFixture {
    pub angle: f64,
    pub track_pos: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub gear: i32,
    pub rpm: f64,
    pub cur_lap_time: f64,
    pub race_pos: i32,
    pub fuel: f64,
    pub track: Vec<f64>,
    pub extra: Vec<(String, String)>,
}

impl Default for TelemetryFixture {
    fn default() -> Self {
        Self::straight()
    }
}

impl TelemetryFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Car on the track axis, heading straight, moderate speed.
    pub fn straight() -> Self {
        Self {
            angle: 0.0,
            track_pos: 0.0,
            speed_x: 60.0,
            speed_y: 0.0,
            gear: 2,
            rpm: 4000.0,
            cur_lap_time: 1.0,
            race_pos: 1,
            fuel: 94.0,
            track: SYMMETRIC_TRACK.to_vec(),
            extra: Vec::new(),
        }
    }

    /// Car on the grid before the start: standing still, first gear.
    pub fn standing_start() -> Self {
        Self {
            speed_x: 0.0,
            gear: 0,
            rpm: 942.0,
            cur_lap_time: -0.982,
            ..Self::straight()
        }
    }

    /// Fast car entering a bend: left sensors read much further than right.
    pub fn fast_bend() -> Self {
        let mut track = SYMMETRIC_TRACK.to_vec();
        if let Some(left) = track.get_mut(6) {
            *left = 100.0;
        }
        if let Some(center) = track.get_mut(9) {
            *center = 50.0;
        }
        if let Some(right) = track.get_mut(12) {
            *right = 20.0;
        }
        Self {
            angle: 0.3,
            track_pos: 0.5,
            speed_x: 120.0,
            gear: 4,
            rpm: 6200.0,
            track,
            ..Self::straight()
        }
    }

    /// Car beyond the right-hand edge.
    pub fn off_track() -> Self {
        Self {
            track_pos: 1.5,
            speed_x: 50.0,
            gear: 1,
            rpm: 3000.0,
            ..Self::straight()
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_track_pos(mut self, track_pos: f64) -> Self {
        self.track_pos = track_pos;
        self
    }

    pub fn with_speed(mut self, speed_x: f64) -> Self {
        self.speed_x = speed_x;
        self
    }

    pub fn with_gear(mut self, gear: i32, rpm: f64) -> Self {
        self.gear = gear;
        self.rpm = rpm;
        self
    }

    pub fn with_lap_time(mut self, cur_lap_time: f64) -> Self {
        self.cur_lap_time = cur_lap_time;
        self
    }

    pub fn with_track(mut self, track: Vec<f64>) -> Self {
        self.track = track;
        self
    }

    /// Append an arbitrary group, e.g. a field the driver does not read.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.extra.push((name.to_string(), value.to_string()));
        self
    }

    /// Wire text without the trailing sentinel.
    pub fn to_wire(&self) -> String {
        let track: Vec<String> = self.track.iter().map(f64::to_string).collect();
        let mut out = format!(
            "(angle {})(curLapTime {})(fuel {})(gear {})(racePos {})(rpm {})(speedX {})(speedY {})(track {})(trackPos {})",
            self.angle,
            self.cur_lap_time,
            self.fuel,
            self.gear,
            self.race_pos,
            self.rpm,
            self.speed_x,
            self.speed_y,
            track.join(" "),
            self.track_pos,
        );
        for (name, value) in &self.extra {
            out.push_str(&format!("({name} {value})"));
        }
        out
    }

    /// Datagram as the server sends it, NUL-terminated.
    pub fn to_datagram(&self) -> Vec<u8> {
        let mut bytes = self.to_wire().into_bytes();
        bytes.push(0);
        bytes
    }
}
