//! Arena index over a project's resource forest.
//!
//! The index holds the nodes in a flat arena and resolves parent links by
//! integer position, so the ancestor walk can track visited positions and
//! fail fast on a cyclic parent chain instead of looping.

use std::collections::HashMap;

use elara_core::{ResourceId, ResourceNode};

use crate::error::{AclError, Result};

/// A project's resource forest, indexed by id and by path.
#[derive(Debug, Default)]
pub struct ResourceIndex {
    nodes: Vec<ResourceNode>,
    by_id: HashMap<ResourceId, usize>,
    by_path: HashMap<String, usize>,
}

impl ResourceIndex {
    /// Build an index from a project's resource rows.
    ///
    /// Rejects duplicate paths; `path` is the unique human-readable key.
    /// Later rows with a duplicate id silently lose to earlier ones.
    pub fn build(nodes: Vec<ResourceNode>) -> Result<Self> {
        let mut index = Self {
            by_id: HashMap::with_capacity(nodes.len()),
            by_path: HashMap::with_capacity(nodes.len()),
            nodes,
        };

        for (pos, node) in index.nodes.iter().enumerate() {
            if index.by_path.insert(node.path.clone(), pos).is_some() {
                return Err(AclError::DuplicatePath(node.path.clone()));
            }
            index.by_id.entry(node.id.clone()).or_insert(pos);
        }

        Ok(index)
    }

    /// Number of nodes in the index.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id.
    pub fn get(&self, id: &ResourceId) -> Option<&ResourceNode> {
        self.by_id.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Look up a node by its unique path.
    pub fn get_by_path(&self, path: &str) -> Option<&ResourceNode> {
        self.by_path.get(path).map(|&pos| &self.nodes[pos])
    }

    /// Collect the ancestor chain of a node: `[node, parent, grandparent,
    /// ...]`, index 0 most specific.
    ///
    /// A `parent_id` that resolves to no node in the index terminates the
    /// walk silently. A parent chain that revisits a node is a
    /// [`AclError::CycleDetected`]. An id not in the index yields an empty
    /// chain.
    pub fn ancestors(&self, id: &ResourceId) -> Result<Vec<&ResourceNode>> {
        let mut chain = Vec::new();
        let mut visited = vec![false; self.nodes.len()];
        let mut current = self.by_id.get(id).copied();

        while let Some(pos) = current {
            if visited[pos] {
                return Err(AclError::CycleDetected(self.nodes[pos].id.clone()));
            }
            visited[pos] = true;

            let node = &self.nodes[pos];
            chain.push(node);
            current = node
                .parent_id
                .as_ref()
                .and_then(|pid| self.by_id.get(pid))
                .copied();
        }

        Ok(chain)
    }

    /// Ancestor chain addressed by path instead of id.
    pub fn ancestors_of_path(&self, path: &str) -> Result<Vec<&ResourceNode>> {
        match self.get_by_path(path) {
            Some(node) => self.ancestors(&node.id),
            None => Ok(Vec::new()),
        }
    }

    /// Iterate all nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }
}
