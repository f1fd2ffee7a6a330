//! Foundation module - shared utilities
//!
//! - Logging setup used by the driver and tests

pub mod logging;
