//! Closed-loop PID driver for the Simulated Car Racing (SCR) server.
//!
//! One call to [`Driver::drive`] is one control tick: it reads a
//! [`CarState`], updates the persistent [`ControllerMemory`] and mutates the
//! held [`ActionCommand`] in place.
//!
//! # Control law
//!
//! - **Steering**: a lateral PID holds the predicted distance from the track
//!   edge at its target, corrected by a curvature term built from the left,
//!   centre and right rangefinder sensors.
//! - **Braking**: hard cornering at speed ramps brake and clutch and ends the
//!   tick early; very high speed ramps the clutch.
//! - **Throttle**: a longitudinal PID drives speed towards the target while
//!   on track; off track the throttle is held at a recovery value.
//! - **Gearbox**: table-driven hysteresis shifting and launch clutch, see
//!   [`gearbox`].
//!
//! # Example
//!
//! ```
//! use openracing_scr_driver::{ControlConfig, Driver, TickOutcome};
//! use openracing_scr_protocol::{CarState, decode};
//!
//! let mut driver = Driver::new(ControlConfig::default());
//! let record = decode(
//!     b"(angle 0)(trackPos 0)(speedX 40)(gear 1)(rpm 3000)(curLapTime 0.5)(racePos 1)\
//!       (track 9 9 9 9 9 9 9 9 9 50 9 9 9 9 9 9 9 9 9)",
//! )?;
//! let state = CarState::from_record(&record)?;
//!
//! assert_eq!(driver.drive(&state), TickOutcome::Primed);
//! assert!(matches!(driver.drive(&state), TickOutcome::Driven { off_track: false }));
//! assert!(driver.action().is_within_limits());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod control;
pub mod error;
pub mod gearbox;
pub mod memory;
pub mod pid;

pub use config::{BrakingConfig, ControlConfig, GainSchedule};
pub use control::{Driver, TickOutcome, edge_distance, step};
pub use error::ConfigError;
pub use gearbox::{GearboxConfig, TOP_GEAR};
pub use memory::ControllerMemory;
pub use pid::{Pid, PidGains};

pub use openracing_scr_protocol::{ActionCommand, CarState};
