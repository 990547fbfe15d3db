//! # Elara Core
//!
//! Pure domain primitives for Elara: identifiers, resource trees, grants,
//! and evaluation contexts.
//!
//! This crate contains no I/O, no storage, no networking. It is pure data
//! and the small amount of logic that belongs to the data itself (wire
//! parsing, principal matching).
//!
//! ## Key Types
//!
//! - [`ResourceNode`] - One node of a project's permissioned resource forest
//! - [`Grant`] - A ranked permission attached to a resource for a principal
//! - [`Principal`] - The closed set of grant targets (user, empresa, tipo, nivel)
//! - [`Perm`] - Totally ordered permission level (`View < Edit < Admin`)
//! - [`Context`] - Who is asking; built per request, never persisted

pub mod context;
pub mod error;
pub mod grant;
pub mod resource;
pub mod types;

pub use context::{Context, Nivel, UserTipo};
pub use error::CoreError;
pub use grant::{Effect, Grant, Perm, Principal};
pub use resource::ResourceNode;
pub use types::{EmpresaId, GrantId, ProjectId, RequestId, ResourceId, UserId};
