//! # bsdfio-base
//! Basic types shared by the bsdfio crates.
//! Contains angle units, spherical coordinates, color models, error types and
//! the small numeric helpers used by the resampling pipeline.
#![warn(missing_docs)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod error;
pub mod math;
pub mod units;
pub mod utils;

/// Version string written into generated files.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
