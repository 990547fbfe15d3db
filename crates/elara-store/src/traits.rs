//! Store trait: the abstract interface for Elara persistence.
//!
//! The resolver and classifier are pure functions; this trait is the seam
//! that feeds them. Implementations include SQLite (primary) and
//! in-memory (for tests).

use async_trait::async_trait;
use elara_core::{Grant, GrantId, ProjectId, RequestId, ResourceId, ResourceNode};
use elara_pagos::PaymentRequest;

use crate::error::Result;

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The row did not exist and was inserted.
    Created,
    /// An existing row was overwritten.
    Updated,
}

/// The Store trait: async interface for Elara rows.
///
/// All methods are async to suit both blocking (SQLite) and remote
/// backends. For SQLite, calls run under `spawn_blocking` to avoid
/// stalling the runtime.
///
/// # Design Notes
///
/// - **Upserts**: writes are keyed by row id and report whether the row
///   was created or updated.
/// - **Path uniqueness**: `(project_id, path)` is unique across
///   resources; claiming an occupied slot with a different id is a
///   [`DuplicatePath`](crate::StoreError::DuplicatePath) error.
/// - **Deterministic listings**: `list_*` methods return resources
///   ordered by path and grants/requests ordered by id.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Resource Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or overwrite a resource node.
    async fn upsert_resource(&self, node: &ResourceNode) -> Result<UpsertOutcome>;

    /// Get a resource by id.
    async fn get_resource(&self, id: &ResourceId) -> Result<Option<ResourceNode>>;

    /// Get a resource by its unique path within a project.
    async fn get_resource_by_path(
        &self,
        project_id: &ProjectId,
        path: &str,
    ) -> Result<Option<ResourceNode>>;

    /// List a project's resources, ordered by path.
    async fn list_resources(&self, project_id: &ProjectId) -> Result<Vec<ResourceNode>>;

    /// Delete a resource by id. Deleting a missing row is a no-op.
    async fn delete_resource(&self, id: &ResourceId) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Grant Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or overwrite a grant.
    async fn upsert_grant(&self, grant: &Grant) -> Result<UpsertOutcome>;

    /// Get a grant by id.
    async fn get_grant(&self, id: &GrantId) -> Result<Option<Grant>>;

    /// List a project's grants, ordered by id.
    async fn list_grants(&self, project_id: &ProjectId) -> Result<Vec<Grant>>;

    /// List the grants attached to one resource, ordered by id.
    async fn list_grants_for_resource(&self, resource_id: &ResourceId) -> Result<Vec<Grant>>;

    /// Delete a grant by id. Deleting a missing row is a no-op.
    async fn delete_grant(&self, id: &GrantId) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Payment Request Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or overwrite a payment request.
    async fn upsert_request(&self, request: &PaymentRequest) -> Result<UpsertOutcome>;

    /// Get a payment request by id.
    async fn get_request(&self, id: &RequestId) -> Result<Option<PaymentRequest>>;

    /// List a project's payment requests, ordered by id.
    async fn list_requests(&self, project_id: &ProjectId) -> Result<Vec<PaymentRequest>>;
}

/// Extension trait for common store patterns.
#[async_trait]
pub trait StoreExt: Store {
    /// Load everything permission evaluation needs for one project.
    async fn load_acl(&self, project_id: &ProjectId) -> Result<(Vec<ResourceNode>, Vec<Grant>)> {
        let resources = self.list_resources(project_id).await?;
        let grants = self.list_grants(project_id).await?;
        Ok((resources, grants))
    }
}

#[async_trait]
impl<S: Store + ?Sized> StoreExt for S {}
