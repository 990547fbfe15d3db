//! # Elara Testkit
//!
//! Testing utilities shared across the Elara crates:
//!
//! - [`fixtures`] - Canned project trees, grant builders, canned contexts
//! - [`generators`] - Proptest strategies over the domain types
//! - [`vectors`] - Golden scenario vectors for the classifier
//!
//! The testkit is a regular dependency only of test code; production
//! crates never depend on it.

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{admin_user, contratista_user, finanzas_user, seeded_engine, ProjectFixture};
pub use vectors::{scenario_vectors, ScenarioVector};
