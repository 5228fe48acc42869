//! Shared types for the emulator test harness
//!
//! Holds the data model every harness component agrees on (test items,
//! service sets, metric records) plus the tracing setup used by the binary.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
