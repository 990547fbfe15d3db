//! Error types for the ACL module.

use elara_core::ResourceId;
use thiserror::Error;

/// Errors that can occur while indexing or walking a resource tree.
#[derive(Debug, Error)]
pub enum AclError {
    /// The parent chain revisited a node.
    #[error("cycle detected in resource tree at {0}")]
    CycleDetected(ResourceId),

    /// Two nodes in the same project share a path.
    #[error("duplicate resource path: {0}")]
    DuplicatePath(String),
}

/// Result type for ACL operations.
pub type Result<T> = std::result::Result<T, AclError>;
