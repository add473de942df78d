//! # Vantage Derivation Engine
//!
//! This crate turns a raw table of per-channel measurements into the derived
//! snapshot the ranking and aggregation stages query: per-measurement
//! population statistics (mean, sample standard deviation) and per-channel
//! normalized scores and relative-deviation percentages.
//!
//! ## Architectural Principles
//!
//! - **Pure logic crate:** no knowledge of where the raw table came from or
//!   what consumes the snapshot. It depends only on `core-types` and
//!   `configuration`.
//! - **Stateless calculation:** the `DerivationEngine` holds no state. It
//!   takes the raw records and the pillar registry as input and produces an
//!   immutable `DerivedTable` as output, which makes it highly reliable and
//!   easy to test.
//!
//! ## Public API
//!
//! - `DerivationEngine`: the main struct that contains the calculation logic.
//! - `DerivedTable`: the immutable snapshot holding every derived column.
//! - `DerivationError`: the specific error types that can be returned.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use engine::DerivationEngine;
pub use error::DerivationError;
pub use table::{DerivedChannel, DerivedScores, DerivedTable, MeasurementStats};
