//! # Elara ACL
//!
//! Effective-permission resolution over a project's resource tree.
//!
//! ## Overview
//!
//! Access is expressed as [`Grant`](elara_core::Grant) rows attached to
//! nodes of a resource forest. Resolving a permission walks the ancestor
//! chain of the target node and combines every grant that applies to the
//! caller's [`Context`](elara_core::Context):
//!
//! - a single applicable deny, on any ancestor, blocks access entirely;
//! - otherwise the highest-ranked allow wins, regardless of which
//!   ancestor carries it.
//!
//! The resolver never fails on missing data — unknown paths, unmatched
//! principals, and dangling parent links all degrade to no access. The
//! one hard error is a cyclic parent chain, which the ancestor walk
//! reports as [`AclError::CycleDetected`] instead of looping.
//!
//! ## Usage
//!
//! ```rust
//! use elara_acl::{has_at_least, resolve_at_path, ResourceIndex};
//! use elara_core::{Context, Grant, Nivel, Perm, Principal, ResourceNode, UserTipo};
//!
//! let root = ResourceNode::root("root", "P1", "obra");
//! let fin = ResourceNode::child("fin", &root, "finanzas");
//! let index = ResourceIndex::build(vec![root, fin]).unwrap();
//!
//! let grants = vec![Grant::allow(
//!     "G1", "P1", "root",
//!     Principal::Tipo(UserTipo::Finanzas),
//!     Perm::Edit,
//! )];
//!
//! let ctx = Context::new("U1", UserTipo::Finanzas, Nivel::Usuario);
//! let perm = resolve_at_path(&index, &ctx, "obra/finanzas", &grants).unwrap();
//! assert!(has_at_least(perm, Perm::Edit));
//! ```

pub mod error;
pub mod index;
pub mod resolve;

pub use error::{AclError, Result};
pub use index::ResourceIndex;
pub use resolve::{has_at_least, resolve_at_path, resolve_perm};
