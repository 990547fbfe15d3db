//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a canned project tree, grant
//! builders, and request builders.

use elara_core::{
    Context, Grant, Nivel, Perm, Principal, ProjectId, ResourceNode, UserTipo,
};
use elara_pagos::PaymentRequest;
use elara_store::MemoryStore;

/// A test fixture around one project.
///
/// The canned tree is the usual shape of a project surface:
///
/// ```text
/// obra
/// ├── finanzas
/// │   └── solicitudes
/// └── documentos
/// ```
pub struct ProjectFixture {
    pub project_id: ProjectId,
    pub store: MemoryStore,
    grant_seq: std::sync::atomic::AtomicU32,
}

impl ProjectFixture {
    /// Create a fixture for project "P1".
    pub fn new() -> Self {
        Self::for_project("P1")
    }

    /// Create a fixture for a specific project id.
    pub fn for_project(project_id: impl Into<ProjectId>) -> Self {
        Self {
            project_id: project_id.into(),
            store: MemoryStore::new(),
            grant_seq: std::sync::atomic::AtomicU32::new(0),
        }
    }

    /// The canned resource tree, parent-first.
    pub fn tree(&self) -> Vec<ResourceNode> {
        let root = ResourceNode::root("root", self.project_id.clone(), "obra");
        let fin = ResourceNode::child("fin", &root, "finanzas");
        let sol = ResourceNode::child("sol", &fin, "solicitudes");
        let docs = ResourceNode::child("docs", &root, "documentos");
        vec![root, fin, sol, docs]
    }

    /// Seed the store with the canned tree.
    pub async fn seed_tree(&self) -> elara_store::Result<()> {
        use elara_store::Store;
        for node in self.tree() {
            self.store.upsert_resource(&node).await?;
        }
        Ok(())
    }

    /// Build an allow grant on a tree node with a generated id.
    pub fn allow(&self, resource: &str, principal: Principal, perm: Perm) -> Grant {
        Grant::allow(
            self.next_grant_id(),
            self.project_id.clone(),
            resource,
            principal,
            perm,
        )
    }

    /// Build a deny grant on a tree node with a generated id.
    pub fn deny(&self, resource: &str, principal: Principal, perm: Perm) -> Grant {
        Grant::deny(
            self.next_grant_id(),
            self.project_id.clone(),
            resource,
            principal,
            perm,
        )
    }

    /// Build a payment request in this project.
    pub fn request(&self, id: &str, total: f64) -> PaymentRequest {
        PaymentRequest::new(id, self.project_id.clone(), total)
    }

    fn next_grant_id(&self) -> String {
        let n = self
            .grant_seq
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        format!("G{}", n + 1)
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an engine over a freshly seeded project store.
///
/// Returns the project id alongside the engine so tests can address it.
pub async fn seeded_engine() -> elara_store::Result<(ProjectId, elara::Engine<MemoryStore>)> {
    let fixture = ProjectFixture::new();
    fixture.seed_tree().await?;
    let project_id = fixture.project_id.clone();
    Ok((
        project_id,
        elara::Engine::new(fixture.store, elara::EngineConfig::default()),
    ))
}

/// A finance-department user with no empresa affiliation.
pub fn finanzas_user() -> Context {
    Context::new("U-fin", UserTipo::Finanzas, Nivel::Usuario)
}

/// A contractor user affiliated with empresa "E1".
pub fn contratista_user() -> Context {
    Context::new("U-con", UserTipo::Contratista, Nivel::Usuario).with_empresa("E1")
}

/// An administrator account.
pub fn admin_user() -> Context {
    Context::new("U-adm", UserTipo::Gerencia, Nivel::Administrador)
}

#[cfg(test)]
mod tests {
    use super::*;
    use elara_acl::{resolve_at_path, ResourceIndex};
    use elara_store::{Store, StoreExt};

    #[test]
    fn test_tree_builds_into_index() {
        let fixture = ProjectFixture::new();
        let index = ResourceIndex::build(fixture.tree()).unwrap();
        assert_eq!(index.len(), 4);
        let chain = index.ancestors_of_path("obra/finanzas/solicitudes").unwrap();
        assert_eq!(chain.len(), 3);
    }

    #[tokio::test]
    async fn test_seeded_store_resolves() {
        let fixture = ProjectFixture::new();
        fixture.seed_tree().await.unwrap();
        fixture
            .store
            .upsert_grant(&fixture.allow("root", Principal::Tipo(UserTipo::Finanzas), Perm::View))
            .await
            .unwrap();

        let (resources, grants) = fixture.store.load_acl(&fixture.project_id).await.unwrap();
        let index = ResourceIndex::build(resources).unwrap();
        let perm = resolve_at_path(&index, &finanzas_user(), "obra/documentos", &grants).unwrap();
        assert_eq!(perm, Some(Perm::View));
    }

    #[tokio::test]
    async fn test_seeded_engine_resolves() {
        let (project_id, engine) = seeded_engine().await.unwrap();
        engine
            .store()
            .upsert_grant(&Grant::allow(
                "G1",
                project_id.clone(),
                "root",
                Principal::Tipo(UserTipo::Finanzas),
                Perm::Edit,
            ))
            .await
            .unwrap();

        let perm = engine
            .effective_perm(&project_id, Some(&finanzas_user()), "obra/finanzas")
            .await
            .unwrap();
        assert_eq!(perm, Some(Perm::Edit));
    }

    #[test]
    fn test_grant_ids_are_unique() {
        let fixture = ProjectFixture::new();
        let a = fixture.allow("root", Principal::Tipo(UserTipo::Finanzas), Perm::View);
        let b = fixture.allow("fin", Principal::Tipo(UserTipo::Finanzas), Perm::Edit);
        assert_ne!(a.id, b.id);
    }
}
