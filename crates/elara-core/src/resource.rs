//! Resource tree nodes.
//!
//! A project's permissioned surface is a forest of resources: contracts,
//! estimation folders, document areas. `path` is the unique human-readable
//! key within a project; `parent_id` is a weak back-reference used only
//! for ancestor lookups.

use serde::{Deserialize, Serialize};

use crate::types::{ProjectId, ResourceId};

/// One node of a project's resource forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Row id.
    pub id: ResourceId,

    /// The project the node belongs to.
    pub project_id: ProjectId,

    /// The parent node, if any. Roots have none.
    pub parent_id: Option<ResourceId>,

    /// Short segment name, e.g. `"finanzas"`.
    pub key: String,

    /// Unique full path within the project, e.g. `"obra/finanzas"`.
    pub path: String,

    /// Optional node kind, e.g. `"modulo"` or `"contrato"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Free-form metadata carried by the backend row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl ResourceNode {
    /// Create a root node.
    pub fn root(
        id: impl Into<ResourceId>,
        project_id: impl Into<ProjectId>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        Self {
            id: id.into(),
            project_id: project_id.into(),
            parent_id: None,
            path: key.clone(),
            key,
            kind: None,
            meta: None,
        }
    }

    /// Create a child node; its path extends the parent's.
    pub fn child(
        id: impl Into<ResourceId>,
        parent: &ResourceNode,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        Self {
            id: id.into(),
            project_id: parent.project_id.clone(),
            parent_id: Some(parent.id.clone()),
            path: format!("{}/{}", parent.path, key),
            key,
            kind: None,
            meta: None,
        }
    }

    /// Set the node kind.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Whether this node is a root of the forest.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
