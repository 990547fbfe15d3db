//! The Engine: unified API for the Elara domain core.
//!
//! The Engine brings together the store, the permission resolver, and the
//! payment-request classifier into a cohesive interface for building
//! application surfaces. It owns the single write path for payment
//! requests: every mutation recomputes the derived state before
//! persisting, so the stored `estado`/`estatus_pago` columns are always a
//! fresh cache of the classifier's output.

use std::sync::Arc;

use tracing::{debug, info};

use elara_acl::{has_at_least, resolve_at_path, ResourceIndex};
use elara_core::{Context, Perm, ProjectId, RequestId};
use elara_pagos::{
    allowed_transitions, check_transition, classify, Classification, Estado, PagosError,
    PaymentRequest, VoboRole,
};
use elara_store::{Store, StoreExt, UpsertOutcome};

use crate::error::{EngineError, Result};

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether write operations are checked against the legal transition
    /// table. Off, the engine still recomputes derived state but accepts
    /// any jump.
    pub enforce_transitions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enforce_transitions: true,
        }
    }
}

/// The main Engine struct.
///
/// Provides a unified API for:
/// - Resolving effective permissions on resource paths
/// - Creating and querying payment requests
/// - Driving the approval/rejection/payment workflow
pub struct Engine<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: EngineConfig,
}

impl<S: Store> Engine<S> {
    /// Create a new engine instance.
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permission Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve the effective permission of a caller on a resource path.
    ///
    /// Fails closed: a missing context, an unknown path, or an empty
    /// project all resolve to `None`. The one hard error besides storage
    /// is a cyclic resource tree.
    pub async fn effective_perm(
        &self,
        project_id: &ProjectId,
        ctx: Option<&Context>,
        path: &str,
    ) -> Result<Option<Perm>> {
        let Some(ctx) = ctx else {
            return Ok(None);
        };

        let (resources, grants) = self.store.load_acl(project_id).await?;
        let index = ResourceIndex::build(resources)?;
        let perm = resolve_at_path(&index, ctx, path, &grants)?;

        debug!(project = %project_id, path, perm = ?perm, "permission resolved");
        Ok(perm)
    }

    /// Require a permission level on a path, or fail with
    /// [`EngineError::NotAuthorized`].
    pub async fn require(
        &self,
        project_id: &ProjectId,
        ctx: &Context,
        path: &str,
        required: Perm,
    ) -> Result<()> {
        let current = self.effective_perm(project_id, Some(ctx), path).await?;
        if has_at_least(current, required) {
            Ok(())
        } else {
            Err(EngineError::NotAuthorized {
                path: path.to_string(),
                required,
            })
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Payment Request Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a payment request, stamping its derived-state cache.
    pub async fn create_request(&self, mut request: PaymentRequest) -> Result<PaymentRequest> {
        if request.total < 0.0 {
            return Err(PagosError::NegativeAmount(request.total).into());
        }
        if request.monto_pagado < 0.0 {
            return Err(PagosError::NegativeAmount(request.monto_pagado).into());
        }

        let c = classify(&request);
        request.estado = Some(c.estado);
        request.estatus_pago = Some(c.estado_pago);

        let outcome = self.store.upsert_request(&request).await?;
        if outcome == UpsertOutcome::Updated {
            debug!(request = %request.id, "create overwrote an existing request");
        }
        Ok(request)
    }

    /// Get a payment request by id.
    pub async fn get_request(&self, id: &RequestId) -> Result<Option<PaymentRequest>> {
        Ok(self.store.get_request(id).await?)
    }

    /// List a project's payment requests.
    pub async fn list_requests(&self, project_id: &ProjectId) -> Result<Vec<PaymentRequest>> {
        Ok(self.store.list_requests(project_id).await?)
    }

    /// Classify a stored payment request.
    ///
    /// Always recomputes from the raw fields; the stored cache is never
    /// trusted on read.
    pub async fn status(&self, id: &RequestId) -> Result<Classification> {
        let request = self.load(id).await?;
        Ok(classify(&request))
    }

    /// The states legally reachable from a request's current state.
    pub async fn transitions(&self, id: &RequestId) -> Result<Vec<Estado>> {
        let request = self.load(id).await?;
        let current = classify(&request).estado;
        Ok(allowed_transitions(current, &request))
    }

    /// Record or withdraw one approval sign-off.
    pub async fn set_vobo(
        &self,
        id: &RequestId,
        role: VoboRole,
        value: bool,
    ) -> Result<PaymentRequest> {
        self.mutate(id, |req| req.set_vobo(role, value)).await
    }

    /// Reject a pending request.
    pub async fn reject(&self, id: &RequestId) -> Result<PaymentRequest> {
        let updated = self.mutate(id, |req| req.estado = Some(Estado::Rechazada)).await?;
        info!(request = %id, "payment request rejected");
        Ok(updated)
    }

    /// Reopen a rejected request.
    ///
    /// Both sign-offs are cleared so the request re-enters review as
    /// pendiente; keeping them would jump straight past approval.
    pub async fn reopen(&self, id: &RequestId) -> Result<PaymentRequest> {
        self.mutate(id, |req| {
            req.estado = Some(Estado::Pendiente);
            req.vobo_desarrollador = false;
            req.vobo_finanzas = false;
        })
        .await
    }

    /// Register a disbursement against an approved request.
    ///
    /// The amount accumulates onto `monto_pagado`; reaching the total
    /// moves the request to pagada.
    pub async fn register_payment(&self, id: &RequestId, monto: f64) -> Result<PaymentRequest> {
        if monto < 0.0 {
            return Err(PagosError::NegativeAmount(monto).into());
        }

        if self.config.enforce_transitions {
            let current = classify(&self.load(id).await?);
            if !current.puede_pagar {
                return Err(EngineError::PaymentNotAllowed {
                    estado: current.estado,
                });
            }
        }

        self.mutate(id, |req| req.monto_pagado += monto).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write Path
    // ─────────────────────────────────────────────────────────────────────────

    async fn load(&self, id: &RequestId) -> Result<PaymentRequest> {
        self.store
            .get_request(id)
            .await?
            .ok_or_else(|| EngineError::RequestNotFound(id.clone()))
    }

    /// The single mutation path: load, mutate, reclassify, stamp, persist.
    async fn mutate<F>(&self, id: &RequestId, f: F) -> Result<PaymentRequest>
    where
        F: FnOnce(&mut PaymentRequest),
    {
        let mut request = self.load(id).await?;
        let from = classify(&request).estado;

        f(&mut request);

        let c = classify(&request);
        if self.config.enforce_transitions {
            check_transition(from, c.estado, &request)?;
        }

        request.estado = Some(c.estado);
        request.estatus_pago = Some(c.estado_pago);
        self.store.upsert_request(&request).await?;

        debug!(request = %id, from = %from, to = %c.estado, "payment request updated");
        Ok(request)
    }
}
