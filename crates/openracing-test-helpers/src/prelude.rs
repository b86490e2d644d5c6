//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use openracing_test_helpers::prelude::*;
//! ```

pub use crate::must::must_some;

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{SYMMETRIC_TRACK, TelemetryFixture};

pub use crate::{assert_approx_eq, assert_in_range};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
