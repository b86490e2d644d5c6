//! scrctl - autonomous driver client for the Simulated Car Racing server.
//!
//! The binary wires three pieces together:
//!
//! - [`transport`]: datagram transport to the server (UDP in production)
//! - [`session`]: identification handshake and the episode/tick loop
//! - [`config`]: typed client configuration built from the command line
//!
//! Control itself lives in `openracing-scr-driver`; the wire format in
//! `openracing-scr-protocol`.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod output;
pub mod session;
pub mod transport;

pub use config::{ClientConfig, Stage};
pub use error::ClientError;
pub use session::{Session, SessionSummary};
pub use transport::{DatagramTransport, UdpTransport};
