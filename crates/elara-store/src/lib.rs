//! # Elara Store
//!
//! Storage abstraction for Elara. Provides a trait-based interface for
//! resource, grant, and payment-request rows with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store module abstracts persistence behind the [`Store`] trait,
//! keeping the resolver and classifier pure functions of data the caller
//! loads. The primary implementation is [`SqliteStore`], with
//! [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`StoreExt`] - Convenience patterns (one-call ACL loading)
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`UpsertOutcome`] - Whether a write created or updated its row
//!
//! ## Usage
//!
//! ```rust,no_run
//! use elara_store::{SqliteStore, Store, StoreExt};
//! use elara_core::ProjectId;
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("elara.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     // Load a project's permission surface in one call
//!     let (resources, grants) = store.load_acl(&ProjectId::new("P1")).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Upserts, not inserts**: writes are keyed by row id and report
//!   `Created` or `Updated`
//! - **Path uniqueness**: `(project_id, path)` is unique across resources
//! - **Deterministic listings**: resources by path, grants/requests by id

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Store, StoreExt, UpsertOutcome};
