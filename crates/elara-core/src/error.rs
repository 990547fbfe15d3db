//! Error types for the Elara core.

use thiserror::Error;

/// Core errors raised while parsing backend wire values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A principal type string outside user|empresa|tipo|nivel.
    #[error("unknown principal type: {0}")]
    UnknownPrincipalType(String),

    /// A user category string outside the fixed enum.
    #[error("unknown tipo: {0}")]
    UnknownTipo(String),

    /// A nivel string outside Administrador|Usuario.
    #[error("unknown nivel: {0}")]
    UnknownNivel(String),

    /// A permission string outside view|edit|admin.
    #[error("unknown perm: {0}")]
    UnknownPerm(String),

    /// An effect string outside allow|deny.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
