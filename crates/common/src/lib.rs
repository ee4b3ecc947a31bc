//! Vantage Common Utilities
//!
//! Shared infrastructure for all Vantage crates:
//! - Error taxonomy and result aliases
//! - Timing helpers for export logging and archive naming
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
