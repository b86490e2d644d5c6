//! Wire protocol for the Simulated Car Racing (SCR) server.
//!
//! The server and client exchange UDP datagrams made of parenthesized groups:
//!
//! ```text
//! (angle 0.0032)(curLapTime -0.982)(gear 1)(track 4.5 4.7 5.2 ...)\0
//! ```
//!
//! Each group holds a field name followed by zero or more value tokens. One
//! token decodes to a scalar, two or more to a sequence. Inbound datagrams may
//! carry a single trailing sentinel byte (usually NUL) that is stripped before
//! parsing.
//!
//! This crate provides:
//!
//! - [`decode`]: raw datagram → [`TelemetryRecord`]
//! - [`CarState`]: typed projection of the fields the driver needs
//! - [`ActionCommand`] and [`encode`]: actuator command → datagram
//! - [`ServerFrame`]: session-control frames (`***identified***`,
//!   `***shutdown***`, `***restart***`) that must be recognized before decoding
//!
//! # Example
//!
//! ```
//! use openracing_scr_protocol::{ActionCommand, decode, encode};
//!
//! let record = decode(b"(speedX 42.5)(track 1 2 3)\0")?;
//! assert_eq!(record.scalar("speedX"), Some(42.5));
//! assert_eq!(record.sequence("track"), Some(&[1.0, 2.0, 3.0][..]));
//!
//! let wire = encode(&ActionCommand::default());
//! assert!(wire.starts_with(b"(accel 0.200)"));
//! # Ok::<(), openracing_scr_protocol::ProtocolError>(())
//! ```

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod action;
pub mod decode;
pub mod encode;
pub mod error;
pub mod frame;
pub mod record;
pub mod state;

pub use action::{ActionCommand, DEFAULT_FOCUS, FOCUS_SENSORS};
pub use decode::{decode, decode_str};
pub use encode::encode;
pub use error::{ProtocolError, StateError, ValueCoercionError};
pub use frame::{
    DEFAULT_RANGEFINDER_ANGLES, IDENTIFIED_MARKER, RANGEFINDER_SENSORS, RESTART_MARKER,
    SHUTDOWN_MARKER, ServerFrame, init_message,
};
pub use record::{FieldValue, TelemetryRecord};
pub use state::{CarState, MIN_TRACK_SENSORS};

/// A specialized `Result` type for decoding operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
