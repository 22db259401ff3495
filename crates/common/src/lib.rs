//! SuitMe Common Utilities
//!
//! Shared infrastructure for all SuitMe crates:
//! - Error types and result aliases
//! - Injectable clocks for pose-hold timing
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
