//! Proptest generators for property-based testing.

use proptest::prelude::*;

use elara_core::{
    Context, Effect, EmpresaId, Grant, Nivel, Perm, Principal, UserId, UserTipo,
};
use elara_pagos::{Estado, PaymentRequest};

/// Generate a permission level.
pub fn perm() -> impl Strategy<Value = Perm> {
    prop_oneof![Just(Perm::View), Just(Perm::Edit), Just(Perm::Admin)]
}

/// Generate an effect, biased toward allow like real grant sets.
pub fn effect() -> impl Strategy<Value = Effect> {
    prop_oneof![4 => Just(Effect::Allow), 1 => Just(Effect::Deny)]
}

/// Generate a user category.
pub fn tipo() -> impl Strategy<Value = UserTipo> {
    prop_oneof![
        Just(UserTipo::Desarrollador),
        Just(UserTipo::Finanzas),
        Just(UserTipo::Gerencia),
        Just(UserTipo::Contratista),
    ]
}

/// Generate an account level.
pub fn nivel() -> impl Strategy<Value = Nivel> {
    prop_oneof![Just(Nivel::Administrador), Just(Nivel::Usuario)]
}

/// Generate a short backend-style id with the given prefix.
pub fn raw_id(prefix: &'static str) -> impl Strategy<Value = String> {
    (0u32..1000).prop_map(move |n| format!("{prefix}{n}"))
}

/// Generate a principal of any kind.
pub fn principal() -> impl Strategy<Value = Principal> {
    prop_oneof![
        raw_id("U").prop_map(|id| Principal::User(UserId::new(id))),
        raw_id("E").prop_map(|id| Principal::Empresa(EmpresaId::new(id))),
        tipo().prop_map(Principal::Tipo),
        nivel().prop_map(Principal::Nivel),
    ]
}

/// Generate a context, sometimes without an empresa.
pub fn context() -> impl Strategy<Value = Context> {
    (
        raw_id("U"),
        proptest::option::of(raw_id("E")),
        tipo(),
        nivel(),
    )
        .prop_map(|(user, empresa, tipo, nivel)| {
            let mut ctx = Context::new(user, tipo, nivel);
            if let Some(e) = empresa {
                ctx = ctx.with_empresa(e);
            }
            ctx
        })
}

/// Generate a grant attached to one of the given resource ids.
pub fn grant_on(resources: Vec<&'static str>) -> impl Strategy<Value = Grant> {
    (
        raw_id("G"),
        proptest::sample::select(resources),
        principal(),
        perm(),
        effect(),
    )
        .prop_map(|(id, resource, principal, perm, effect)| Grant {
            id: id.into(),
            project_id: "P1".into(),
            resource_id: resource.into(),
            principal,
            perm,
            effect,
        })
}

/// Generate a payment request with arbitrary flags, amounts, and cache
/// fields.
pub fn payment_request() -> impl Strategy<Value = PaymentRequest> {
    (
        raw_id("S"),
        any::<bool>(),
        any::<bool>(),
        0.0f64..1_000_000.0,
        0.0f64..1_000_000.0,
        proptest::option::of(prop_oneof![
            Just(Estado::Pendiente),
            Just(Estado::Aprobada),
            Just(Estado::Pagada),
            Just(Estado::Rechazada),
        ]),
    )
        .prop_map(|(id, vobo_d, vobo_f, monto_pagado, total, estado)| {
            let mut req = PaymentRequest::new(id, "P1", total);
            req.vobo_desarrollador = vobo_d;
            req.vobo_finanzas = vobo_f;
            req.monto_pagado = monto_pagado;
            req.estado = estado;
            req
        })
}
