//! Session-control frames and the identification message.

use crate::encode::push_group;

pub const IDENTIFIED_MARKER: &str = "***identified***";
pub const SHUTDOWN_MARKER: &str = "***shutdown***";
pub const RESTART_MARKER: &str = "***restart***";

/// Number of track rangefinder sensors requested at identification.
pub const RANGEFINDER_SENSORS: usize = 19;

/// Rangefinder directions requested by default, in degrees from the car axis.
pub const DEFAULT_RANGEFINDER_ANGLES: [f64; RANGEFINDER_SENSORS] = [
    -90.0, -75.0, -60.0, -45.0, -30.0, -20.0, -15.0, -10.0, -5.0, 0.0, 5.0, 10.0, 15.0, 20.0,
    30.0, 45.0, 60.0, 75.0, 90.0,
];

/// Classification of an inbound datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerFrame<'a> {
    /// The server accepted the identification message.
    Identified,
    /// The race is over; the client should stop.
    Shutdown,
    /// The race is restarting; the current episode ends.
    Restart,
    /// Anything else, to be handed to [`decode`](crate::decode).
    Telemetry(&'a [u8]),
}

impl<'a> ServerFrame<'a> {
    /// Classify a datagram by the markers it contains.
    ///
    /// Markers are substrings, not groups, so they are checked before any
    /// attempt to decode telemetry.
    pub fn classify(raw: &'a [u8]) -> Self {
        if contains(raw, SHUTDOWN_MARKER) {
            ServerFrame::Shutdown
        } else if contains(raw, RESTART_MARKER) {
            ServerFrame::Restart
        } else if contains(raw, IDENTIFIED_MARKER) {
            ServerFrame::Identified
        } else {
            ServerFrame::Telemetry(raw)
        }
    }

    pub fn is_control(&self) -> bool {
        !matches!(self, ServerFrame::Telemetry(_))
    }
}

fn contains(haystack: &[u8], marker: &str) -> bool {
    haystack
        .windows(marker.len())
        .any(|window| window == marker.as_bytes())
}

/// Build the identification datagram `<id>(init a1 a2 ...)`.
pub fn init_message(client_id: &str, angles: &[f64]) -> String {
    let mut out = String::from(client_id);
    push_group(&mut out, "init", angles);
    out
}
