//! Evaluation context: who is asking.
//!
//! A [`Context`] is built per request from the caller's authenticated
//! session. It is never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::types::{EmpresaId, UserId};

/// Fixed category of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserTipo {
    Desarrollador,
    Finanzas,
    Gerencia,
    Contratista,
}

impl UserTipo {
    /// The wire string used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserTipo::Desarrollador => "Desarrollador",
            UserTipo::Finanzas => "Finanzas",
            UserTipo::Gerencia => "Gerencia",
            UserTipo::Contratista => "Contratista",
        }
    }

    /// Parse a wire string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "Desarrollador" => Ok(UserTipo::Desarrollador),
            "Finanzas" => Ok(UserTipo::Finanzas),
            "Gerencia" => Ok(UserTipo::Gerencia),
            "Contratista" => Ok(UserTipo::Contratista),
            other => Err(CoreError::UnknownTipo(other.to_string())),
        }
    }
}

impl fmt::Display for UserTipo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account level: administrators bypass nothing here, but grants may
/// target the level as a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nivel {
    Administrador,
    Usuario,
}

impl Nivel {
    /// The wire string used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Nivel::Administrador => "Administrador",
            Nivel::Usuario => "Usuario",
        }
    }

    /// Parse a wire string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "Administrador" => Ok(Nivel::Administrador),
            "Usuario" => Ok(Nivel::Usuario),
            other => Err(CoreError::UnknownNivel(other.to_string())),
        }
    }
}

impl fmt::Display for Nivel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The principal-side input to permission evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// The authenticated user.
    pub user_id: UserId,

    /// The empresa the user belongs to, if any.
    pub empresa_id: Option<EmpresaId>,

    /// The user's category.
    pub tipo: UserTipo,

    /// The user's account level.
    pub nivel: Nivel,
}

impl Context {
    /// Create a context with no empresa affiliation.
    pub fn new(user_id: impl Into<UserId>, tipo: UserTipo, nivel: Nivel) -> Self {
        Self {
            user_id: user_id.into(),
            empresa_id: None,
            tipo,
            nivel,
        }
    }

    /// Attach an empresa affiliation.
    pub fn with_empresa(mut self, empresa_id: impl Into<EmpresaId>) -> Self {
        self.empresa_id = Some(empresa_id.into());
        self
    }

    /// The empresa id used for grant matching: the empty string when the
    /// context carries no empresa.
    pub fn empresa_or_empty(&self) -> &str {
        self.empresa_id.as_ref().map(EmpresaId::as_str).unwrap_or("")
    }
}
