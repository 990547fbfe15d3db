//! # Elara
//!
//! The unified API for the Elara domain core: hierarchical permissions
//! and the payment-request workflow for construction-project contracts.
//!
//! ## Overview
//!
//! Elara manages who may see and act on a project's resources, and what
//! happens to a payment request on its way from capture to disbursement:
//!
//! - **Resources**: a forest of permissioned nodes addressed by path
//! - **Grants**: ranked allow/deny rows attached to resources, resolved
//!   with a global deny-override
//! - **Payment requests**: records whose discrete state is recomputed
//!   from raw sign-off and payment fields on every read
//! - **Engine**: the single write path that keeps the stored state cache
//!   in lockstep with the classifier
//!
//! ## Key Concepts
//!
//! - **Derived state is never trusted from storage.** The classifier is
//!   canonical; stored `estado`/`estatus_pago` columns are a cache the
//!   engine refreshes on every write.
//! - **Deny wins everywhere.** A single applicable deny grant blocks
//!   access no matter how specific the competing allows are.
//! - **Transitions are gated, not forced.** The legal transition table
//!   guards the engine's own writes; records mutated elsewhere still
//!   classify deterministically.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use elara::{Engine, EngineConfig};
//! use elara::core::{Context, Nivel, ProjectId, UserTipo};
//! use elara::pagos::PaymentRequest;
//! use elara::store::MemoryStore;
//!
//! async fn example() {
//!     let engine = Engine::new(MemoryStore::new(), EngineConfig::default());
//!     let project = ProjectId::new("P1");
//!
//!     // Resolve what the caller may do.
//!     let ctx = Context::new("U1", UserTipo::Finanzas, Nivel::Usuario);
//!     let perm = engine
//!         .effective_perm(&project, Some(&ctx), "obra/finanzas")
//!         .await
//!         .unwrap();
//!
//!     // Drive a request through the workflow.
//!     let request = engine
//!         .create_request(PaymentRequest::new("S1", "P1", 1000.0))
//!         .await
//!         .unwrap();
//!     // engine.set_vobo(&request.id, VoboRole::Desarrollador, true).await...
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `elara::core` - Domain primitives (ids, resources, grants, contexts)
//! - `elara::acl` - Permission resolution
//! - `elara::pagos` - Payment-request classification and transitions
//! - `elara::store` - Storage abstraction, SQLite and memory backends

pub mod engine;
pub mod error;

// Re-export component crates
pub use elara_acl as acl;
pub use elara_core as core;
pub use elara_pagos as pagos;
pub use elara_store as store;

// Re-export main types for convenience
pub use engine::{Engine, EngineConfig};
pub use error::{EngineError, Result};

// Re-export commonly used domain types
pub use elara_core::{Context, Effect, Grant, Nivel, Perm, Principal, ResourceNode, UserTipo};
pub use elara_pagos::{classify, Classification, Estado, EstadoPago, PaymentRequest, VoboRole};
pub use elara_store::{MemoryStore, SqliteStore, Store, StoreExt, UpsertOutcome};
