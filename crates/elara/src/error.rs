//! Error types for the Engine.

use elara_acl::AclError;
use elara_core::{Perm, RequestId};
use elara_pagos::{Estado, PagosError};
use elara_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Permission-tree error.
    #[error("acl error: {0}")]
    Acl(#[from] AclError),

    /// Payment-workflow error.
    #[error("pagos error: {0}")]
    Pagos(#[from] PagosError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Payment request not found.
    #[error("payment request not found: {0}")]
    RequestNotFound(RequestId),

    /// The caller lacks the required permission.
    #[error("not authorized: {required} on {path}")]
    NotAuthorized {
        /// Resource path the caller asked about.
        path: String,
        /// The permission the action demands.
        required: Perm,
    },

    /// A payment registered against a request that cannot take one.
    #[error("payment not allowed while {estado}")]
    PaymentNotAllowed {
        /// The request's current state.
        estado: Estado,
    },
}

/// Result type for Engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
