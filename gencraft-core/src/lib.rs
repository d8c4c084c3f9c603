//! Core functionality for gencraft.
//!
//! This crate provides the fundamental building blocks for property-based
//! testing with explicit, composable generators: a splittable random
//! source, primitive and string generators, the `map` / `filter` /
//! `flat_map` / `one_of` / `combine` combinators, and a property runner
//! that reports the seed of every failure.

pub mod arbitrary;
pub mod combine;
pub mod data;
pub mod error;
pub mod gen;
pub mod parallel;
pub mod property;
pub mod stages;
pub mod text;

// Re-export the main types
pub use arbitrary::*;
pub use combine::*;
pub use data::*;
pub use error::*;
pub use gen::*;
pub use parallel::*;
pub use property::*;
pub use stages::*;
pub use text::*;
