//! Shared test utilities for the OpenRacing SCR client.
//!
//! # Modules
//!
//! - [`mod@must`] - `must_some` with a message and `#[track_caller]`
//! - [`assertions`] - Float and range assertion macros
//! - [`fixtures`] - Telemetry datagram builders
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! openracing-test-helpers = { workspace = true, features = ["fixtures"] }
//! ```
//!
//! ```rust,ignore
//! use openracing_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod assertions;
pub mod must;
pub mod prelude;

#[cfg(feature = "fixtures")]
#[cfg_attr(docsrs, doc(cfg(feature = "fixtures")))]
pub mod fixtures;

pub use must::*;
