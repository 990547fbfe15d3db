//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite —
//! path uniqueness included — but keeps everything in memory with no
//! persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use elara_core::{Grant, GrantId, ProjectId, RequestId, ResourceId, ResourceNode};
use elara_pagos::PaymentRequest;

use crate::error::{Result, StoreError};
use crate::traits::{Store, UpsertOutcome};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Resources indexed by id.
    resources: HashMap<ResourceId, ResourceNode>,

    /// Path index: (project_id, path) -> resource id.
    paths: HashMap<(ProjectId, String), ResourceId>,

    /// Grants indexed by id.
    grants: HashMap<GrantId, Grant>,

    /// Payment requests indexed by id.
    requests: HashMap<RequestId, PaymentRequest>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_resource(&self, node: &ResourceNode) -> Result<UpsertOutcome> {
        let mut inner = self.write()?;

        let slot = (node.project_id.clone(), node.path.clone());
        if let Some(occupant) = inner.paths.get(&slot) {
            if *occupant != node.id {
                return Err(StoreError::DuplicatePath(node.path.clone()));
            }
        }

        let previous = inner.resources.insert(node.id.clone(), node.clone());

        // A node moving to a new path releases its old slot.
        if let Some(prev) = &previous {
            if prev.path != node.path || prev.project_id != node.project_id {
                inner
                    .paths
                    .remove(&(prev.project_id.clone(), prev.path.clone()));
            }
        }
        inner.paths.insert(slot, node.id.clone());

        Ok(match previous {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Created,
        })
    }

    async fn get_resource(&self, id: &ResourceId) -> Result<Option<ResourceNode>> {
        Ok(self.read()?.resources.get(id).cloned())
    }

    async fn get_resource_by_path(
        &self,
        project_id: &ProjectId,
        path: &str,
    ) -> Result<Option<ResourceNode>> {
        let inner = self.read()?;
        Ok(inner
            .paths
            .get(&(project_id.clone(), path.to_string()))
            .and_then(|id| inner.resources.get(id))
            .cloned())
    }

    async fn list_resources(&self, project_id: &ProjectId) -> Result<Vec<ResourceNode>> {
        let inner = self.read()?;
        let mut nodes: Vec<ResourceNode> = inner
            .resources
            .values()
            .filter(|n| n.project_id == *project_id)
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(nodes)
    }

    async fn delete_resource(&self, id: &ResourceId) -> Result<()> {
        let mut inner = self.write()?;
        if let Some(node) = inner.resources.remove(id) {
            inner.paths.remove(&(node.project_id, node.path));
        }
        Ok(())
    }

    async fn upsert_grant(&self, grant: &Grant) -> Result<UpsertOutcome> {
        let mut inner = self.write()?;
        Ok(match inner.grants.insert(grant.id.clone(), grant.clone()) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Created,
        })
    }

    async fn get_grant(&self, id: &GrantId) -> Result<Option<Grant>> {
        Ok(self.read()?.grants.get(id).cloned())
    }

    async fn list_grants(&self, project_id: &ProjectId) -> Result<Vec<Grant>> {
        let inner = self.read()?;
        let mut grants: Vec<Grant> = inner
            .grants
            .values()
            .filter(|g| g.project_id == *project_id)
            .cloned()
            .collect();
        grants.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(grants)
    }

    async fn list_grants_for_resource(&self, resource_id: &ResourceId) -> Result<Vec<Grant>> {
        let inner = self.read()?;
        let mut grants: Vec<Grant> = inner
            .grants
            .values()
            .filter(|g| g.resource_id == *resource_id)
            .cloned()
            .collect();
        grants.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(grants)
    }

    async fn delete_grant(&self, id: &GrantId) -> Result<()> {
        self.write()?.grants.remove(id);
        Ok(())
    }

    async fn upsert_request(&self, request: &PaymentRequest) -> Result<UpsertOutcome> {
        let mut inner = self.write()?;
        Ok(
            match inner.requests.insert(request.id.clone(), request.clone()) {
                Some(_) => UpsertOutcome::Updated,
                None => UpsertOutcome::Created,
            },
        )
    }

    async fn get_request(&self, id: &RequestId) -> Result<Option<PaymentRequest>> {
        Ok(self.read()?.requests.get(id).cloned())
    }

    async fn list_requests(&self, project_id: &ProjectId) -> Result<Vec<PaymentRequest>> {
        let inner = self.read()?;
        let mut requests: Vec<PaymentRequest> = inner
            .requests
            .values()
            .filter(|r| r.project_id == *project_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(requests)
    }
}
