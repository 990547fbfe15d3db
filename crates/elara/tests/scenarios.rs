//! End-to-end workflow scenarios over the in-memory store.
//!
//! These exercise the engine the way an application surface would: seed a
//! project's resource tree and grants, then walk payment requests through
//! approval, rejection, and disbursement.

use anyhow::Result;

use elara::core::{
    Context, EmpresaId, Grant, Nivel, Perm, Principal, ProjectId, RequestId, ResourceNode,
    UserId, UserTipo,
};
use elara::pagos::{Estado, EstadoPago, PaymentRequest, VoboRole};
use elara::store::{MemoryStore, Store};
use elara::{Engine, EngineConfig, EngineError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Seed a project: obra -> { finanzas -> solicitudes, documentos }.
async fn seed_project(store: &MemoryStore) -> Result<()> {
    let root = ResourceNode::root("root", "P1", "obra");
    let fin = ResourceNode::child("fin", &root, "finanzas");
    let sol = ResourceNode::child("sol", &fin, "solicitudes");
    let docs = ResourceNode::child("docs", &root, "documentos");

    for node in [&root, &fin, &sol, &docs] {
        store.upsert_resource(node).await?;
    }
    Ok(())
}

fn finanzas_ctx() -> Context {
    Context::new("U1", UserTipo::Finanzas, Nivel::Usuario)
}

#[tokio::test]
async fn deny_on_root_blocks_specific_allow() -> Result<()> {
    init_tracing();
    let store = MemoryStore::new();
    seed_project(&store).await?;

    // Admin allow on the leaf, view deny on the distant root.
    store
        .upsert_grant(&Grant::allow(
            "G1",
            "P1",
            "sol",
            Principal::User(UserId::new("U1")),
            Perm::Admin,
        ))
        .await?;
    store
        .upsert_grant(&Grant::deny(
            "G2",
            "P1",
            "root",
            Principal::Tipo(UserTipo::Finanzas),
            Perm::View,
        ))
        .await?;

    let engine = Engine::new(store, EngineConfig::default());
    let perm = engine
        .effective_perm(
            &ProjectId::new("P1"),
            Some(&finanzas_ctx()),
            "obra/finanzas/solicitudes",
        )
        .await?;
    assert_eq!(perm, None);

    // A sibling subtree untouched by the leaf allow is equally denied.
    let perm = engine
        .effective_perm(&ProjectId::new("P1"), Some(&finanzas_ctx()), "obra/documentos")
        .await?;
    assert_eq!(perm, None);
    Ok(())
}

#[tokio::test]
async fn inherited_allow_reaches_descendants() -> Result<()> {
    let store = MemoryStore::new();
    seed_project(&store).await?;

    store
        .upsert_grant(&Grant::allow(
            "G1",
            "P1",
            "root",
            Principal::Empresa(EmpresaId::new("E1")),
            Perm::View,
        ))
        .await?;
    store
        .upsert_grant(&Grant::allow(
            "G2",
            "P1",
            "fin",
            Principal::Empresa(EmpresaId::new("E1")),
            Perm::Edit,
        ))
        .await?;

    let engine = Engine::new(store, EngineConfig::default());
    let project = ProjectId::new("P1");
    let ctx = Context::new("U9", UserTipo::Contratista, Nivel::Usuario).with_empresa("E1");

    // The deeper allow raises the effective level below it.
    assert_eq!(
        engine
            .effective_perm(&project, Some(&ctx), "obra/finanzas/solicitudes")
            .await?,
        Some(Perm::Edit)
    );
    // Outside that subtree only the root view applies.
    assert_eq!(
        engine
            .effective_perm(&project, Some(&ctx), "obra/documentos")
            .await?,
        Some(Perm::View)
    );
    Ok(())
}

#[tokio::test]
async fn full_disbursement_workflow() -> Result<()> {
    init_tracing();
    let store = MemoryStore::new();
    seed_project(&store).await?;
    let engine = Engine::new(store, EngineConfig::default());
    let id = RequestId::new("S1");

    engine
        .create_request(PaymentRequest::new("S1", "P1", 1000.0).with_folio("REQ-001"))
        .await?;

    // Nothing payable while pendiente.
    let err = engine.register_payment(&id, 500.0).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::PaymentNotAllowed { estado: Estado::Pendiente }
    ));

    // First sign-off leaves it pendiente.
    engine.set_vobo(&id, VoboRole::Desarrollador, true).await?;
    let status = engine.status(&id).await?;
    assert_eq!(status.estado, Estado::Pendiente);
    assert_eq!(status.descripcion, "Pendiente de Vo.Bo. de Finanzas");

    // Second sign-off approves.
    engine.set_vobo(&id, VoboRole::Finanzas, true).await?;
    let status = engine.status(&id).await?;
    assert_eq!(status.estado, Estado::Aprobada);
    assert!(status.puede_pagar);

    // Partial disbursement stays aprobada.
    engine.register_payment(&id, 400.0).await?;
    let status = engine.status(&id).await?;
    assert_eq!(status.estado, Estado::Aprobada);
    assert_eq!(status.estado_pago, EstadoPago::PagadoParcialmente);
    assert_eq!(status.porcentaje, 40.0);

    // Completing the payment lands pagada, and pagada is terminal.
    engine.register_payment(&id, 600.0).await?;
    let status = engine.status(&id).await?;
    assert_eq!(status.estado, Estado::Pagada);
    assert!(engine.transitions(&id).await?.is_empty());

    let err = engine.register_payment(&id, 1.0).await.unwrap_err();
    assert!(matches!(err, EngineError::PaymentNotAllowed { .. }));
    Ok(())
}

#[tokio::test]
async fn rejection_and_reopen_cycle() -> Result<()> {
    let store = MemoryStore::new();
    let engine = Engine::new(store, EngineConfig::default());
    let id = RequestId::new("S1");

    engine
        .create_request(PaymentRequest::new("S1", "P1", 500.0))
        .await?;
    engine.set_vobo(&id, VoboRole::Desarrollador, true).await?;
    engine.reject(&id).await?;

    let status = engine.status(&id).await?;
    assert_eq!(status.estado, Estado::Rechazada);
    assert_eq!(engine.transitions(&id).await?, vec![Estado::Pendiente]);

    // No payments against a rejected request.
    let err = engine.register_payment(&id, 500.0).await.unwrap_err();
    assert!(matches!(err, EngineError::PaymentNotAllowed { .. }));

    // Reopening clears the sign-offs and lands pendiente.
    let reopened = engine.reopen(&id).await?;
    assert!(!reopened.vobo_desarrollador);
    assert!(!reopened.vobo_finanzas);
    assert_eq!(engine.status(&id).await?.estado, Estado::Pendiente);
    Ok(())
}

#[tokio::test]
async fn withdrawn_vobo_returns_to_pendiente() -> Result<()> {
    let store = MemoryStore::new();
    let engine = Engine::new(store, EngineConfig::default());
    let id = RequestId::new("S1");

    engine
        .create_request(PaymentRequest::new("S1", "P1", 500.0))
        .await?;
    engine.set_vobo(&id, VoboRole::Desarrollador, true).await?;
    engine.set_vobo(&id, VoboRole::Finanzas, true).await?;
    assert_eq!(engine.status(&id).await?.estado, Estado::Aprobada);

    engine.set_vobo(&id, VoboRole::Finanzas, false).await?;
    let status = engine.status(&id).await?;
    assert_eq!(status.estado, Estado::Pendiente);
    assert!(status.puede_aprobar);
    Ok(())
}

#[tokio::test]
async fn externally_paid_record_classifies_pagada_over_rechazada() -> Result<()> {
    // A record written behind the engine's back: fully paid but still
    // flagged rechazada. The classifier's precedence decides.
    let store = MemoryStore::new();
    let mut req = PaymentRequest::new("S1", "P1", 1000.0);
    req.monto_pagado = 1000.0;
    req.estado = Some(Estado::Rechazada);
    store.upsert_request(&req).await?;

    let engine = Engine::new(store, EngineConfig::default());
    let status = engine.status(&RequestId::new("S1")).await?;
    assert_eq!(status.estado, Estado::Pagada);
    Ok(())
}

#[tokio::test]
async fn unenforced_engine_accepts_any_jump() -> Result<()> {
    let store = MemoryStore::new();
    let engine = Engine::new(
        store,
        EngineConfig {
            enforce_transitions: false,
        },
    );
    let id = RequestId::new("S1");

    engine
        .create_request(PaymentRequest::new("S1", "P1", 100.0))
        .await?;

    // Payment against a pendiente request goes through unchecked and the
    // cache still lands on the classifier's verdict.
    engine.register_payment(&id, 100.0).await?;
    let stored = engine.get_request(&id).await?.unwrap();
    assert_eq!(stored.estado, Some(Estado::Pagada));
    assert_eq!(stored.estatus_pago, Some(EstadoPago::Pagado));
    Ok(())
}

#[tokio::test]
async fn workflow_over_sqlite_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = elara::store::SqliteStore::open(dir.path().join("elara.db"))?;
    let engine = Engine::new(store, EngineConfig::default());
    let id = RequestId::new("S1");

    engine
        .create_request(PaymentRequest::new("S1", "P1", 750.0))
        .await?;
    engine.set_vobo(&id, VoboRole::Desarrollador, true).await?;
    engine.set_vobo(&id, VoboRole::Finanzas, true).await?;
    engine.register_payment(&id, 750.0).await?;

    let stored = engine.get_request(&id).await?.unwrap();
    assert_eq!(stored.estado, Some(Estado::Pagada));
    assert_eq!(stored.estatus_pago, Some(EstadoPago::Pagado));
    Ok(())
}

#[tokio::test]
async fn cache_refreshed_on_every_write() -> Result<()> {
    let store = MemoryStore::new();
    let engine = Engine::new(store, EngineConfig::default());
    let id = RequestId::new("S1");

    engine
        .create_request(PaymentRequest::new("S1", "P1", 200.0))
        .await?;
    let stored = engine.get_request(&id).await?.unwrap();
    assert_eq!(stored.estado, Some(Estado::Pendiente));
    assert_eq!(stored.estatus_pago, Some(EstadoPago::NoPagado));

    engine.set_vobo(&id, VoboRole::Desarrollador, true).await?;
    engine.set_vobo(&id, VoboRole::Finanzas, true).await?;
    let stored = engine.get_request(&id).await?.unwrap();
    assert_eq!(stored.estado, Some(Estado::Aprobada));
    Ok(())
}
