//! Permission grants and the principals they target.
//!
//! A grant attaches a ranked permission to one node of a project's
//! resource tree, for one principal. Principals are a closed set of four
//! kinds, modeled as a tagged union so that adding a kind is a
//! compile-time exercise rather than a silent fallthrough.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::{Context, Nivel, UserTipo};
use crate::error::CoreError;
use crate::types::{EmpresaId, GrantId, ProjectId, ResourceId, UserId};

/// A ranked permission level.
///
/// Totally ordered: `View < Edit < Admin`. Combining grants takes the
/// maximum, so deriving `Ord` on the declaration order is the whole
/// ranking scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perm {
    View,
    Edit,
    Admin,
}

impl Perm {
    /// Numeric rank: view=1, edit=2, admin=3.
    pub fn rank(&self) -> u8 {
        match self {
            Perm::View => 1,
            Perm::Edit => 2,
            Perm::Admin => 3,
        }
    }

    /// The wire string used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Perm::View => "view",
            Perm::Edit => "edit",
            Perm::Admin => "admin",
        }
    }

    /// Parse a wire string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "view" => Ok(Perm::View),
            "edit" => Ok(Perm::Edit),
            "admin" => Ok(Perm::Admin),
            other => Err(CoreError::UnknownPerm(other.to_string())),
        }
    }
}

impl fmt::Display for Perm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a grant allows or denies its permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

impl Effect {
    /// The wire string used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "allow",
            Effect::Deny => "deny",
        }
    }

    /// Parse a wire string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "allow" => Ok(Effect::Allow),
            "deny" => Ok(Effect::Deny),
            other => Err(CoreError::UnknownEffect(other.to_string())),
        }
    }
}

/// The entity a grant is issued to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "principal_type", content = "principal_id", rename_all = "lowercase")]
pub enum Principal {
    /// A single user account.
    User(UserId),

    /// Every member of an empresa.
    Empresa(EmpresaId),

    /// Every user of a category.
    Tipo(UserTipo),

    /// Every user of an account level.
    Nivel(Nivel),
}

impl Principal {
    /// Whether this principal covers the given context.
    ///
    /// An empresa grant authored with an empty id matches any context that
    /// carries no empresa; the comparison treats an absent empresa as the
    /// empty string.
    pub fn applies_to(&self, ctx: &Context) -> bool {
        match self {
            Principal::User(id) => *id == ctx.user_id,
            Principal::Empresa(id) => id.as_str() == ctx.empresa_or_empty(),
            Principal::Tipo(tipo) => *tipo == ctx.tipo,
            Principal::Nivel(nivel) => *nivel == ctx.nivel,
        }
    }

    /// The wire discriminator: user|empresa|tipo|nivel.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Principal::User(_) => "user",
            Principal::Empresa(_) => "empresa",
            Principal::Tipo(_) => "tipo",
            Principal::Nivel(_) => "nivel",
        }
    }

    /// The wire id: the raw id for user/empresa, the enum string for
    /// tipo/nivel.
    pub fn id_str(&self) -> &str {
        match self {
            Principal::User(id) => id.as_str(),
            Principal::Empresa(id) => id.as_str(),
            Principal::Tipo(tipo) => tipo.as_str(),
            Principal::Nivel(nivel) => nivel.as_str(),
        }
    }

    /// Rebuild a principal from its wire pair.
    pub fn from_parts(kind: &str, id: &str) -> Result<Self, CoreError> {
        match kind {
            "user" => Ok(Principal::User(UserId::new(id))),
            "empresa" => Ok(Principal::Empresa(EmpresaId::new(id))),
            "tipo" => Ok(Principal::Tipo(UserTipo::parse(id)?)),
            "nivel" => Ok(Principal::Nivel(Nivel::parse(id)?)),
            other => Err(CoreError::UnknownPrincipalType(other.to_string())),
        }
    }
}

/// A permission grant on one resource for one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Row id.
    pub id: GrantId,

    /// The project the grant belongs to.
    pub project_id: ProjectId,

    /// The resource the grant attaches to.
    pub resource_id: ResourceId,

    /// Who the grant is issued to.
    #[serde(flatten)]
    pub principal: Principal,

    /// The permission level granted (or denied).
    pub perm: Perm,

    /// Allow or deny; absent on the wire means allow.
    #[serde(default)]
    pub effect: Effect,
}

impl Grant {
    /// Create an allow grant.
    pub fn allow(
        id: impl Into<GrantId>,
        project_id: impl Into<ProjectId>,
        resource_id: impl Into<ResourceId>,
        principal: Principal,
        perm: Perm,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            resource_id: resource_id.into(),
            principal,
            perm,
            effect: Effect::Allow,
        }
    }

    /// Create a deny grant.
    pub fn deny(
        id: impl Into<GrantId>,
        project_id: impl Into<ProjectId>,
        resource_id: impl Into<ResourceId>,
        principal: Principal,
        perm: Perm,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            resource_id: resource_id.into(),
            principal,
            perm,
            effect: Effect::Deny,
        }
    }
}
