//! Gencraft: composable random data generation for property-based testing.
//!
//! This is the main entry point, re-exporting the core generators and
//! runner alongside ready-made recipes for postal addresses, zip codes
//! and substring parameters.

pub use gencraft_core::*;

// Re-export derive macros when available
#[cfg(feature = "derive")]
pub use gencraft_derive::*;

pub mod address;
pub mod recipes;
