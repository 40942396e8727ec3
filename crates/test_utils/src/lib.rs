//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! book access test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for books and documents
//! - `logging`: One-time tracing setup for tests
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod logging;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use logging::*;
pub use assertions::*;
pub use generators::*;
