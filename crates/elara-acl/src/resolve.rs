//! Effective-permission resolution.
//!
//! Given a context, an ancestor chain, and a project's grant rows, compute
//! the effective permission on the chain's leaf. The rules:
//!
//! 1. Only grants on a resource in the ancestor chain count.
//! 2. Only grants whose principal covers the context count.
//! 3. No applicable grant means no access.
//! 4. A single applicable deny — on any ancestor, however distant — blocks
//!    access outright. Deny is global, not most-specific-wins.
//! 5. Otherwise the highest-ranked allow wins, regardless of which
//!    ancestor carries it.
//!
//! The resolver is a pure function of its arguments: no I/O, no mutation,
//! no panics. Missing data degrades to no access.

use elara_core::{Context, Effect, Grant, Perm, ResourceNode};

use crate::error::Result;
use crate::index::ResourceIndex;

/// Compute the effective permission for `ctx` on the leaf of `ancestors`.
///
/// `ancestors` is ordered most-specific-first, as produced by
/// [`ResourceIndex::ancestors`]. `None` means no access.
pub fn resolve_perm(
    ctx: &Context,
    ancestors: &[&ResourceNode],
    grants: &[Grant],
) -> Option<Perm> {
    let applicable: Vec<&Grant> = grants
        .iter()
        .filter(|g| ancestors.iter().any(|node| node.id == g.resource_id))
        .filter(|g| g.principal.applies_to(ctx))
        .collect();

    if applicable.is_empty() {
        return None;
    }

    // Deny anywhere in the applicable set blocks the whole resolution,
    // even against a higher-ranked allow on a more specific ancestor.
    if applicable.iter().any(|g| g.effect == Effect::Deny) {
        return None;
    }

    applicable
        .iter()
        .filter(|g| g.effect == Effect::Allow)
        .map(|g| g.perm)
        .max()
}

/// Resolve the effective permission for a path in one call.
///
/// An unknown path resolves to no access; a malformed tree (cycle) is the
/// only error.
pub fn resolve_at_path(
    index: &ResourceIndex,
    ctx: &Context,
    path: &str,
    grants: &[Grant],
) -> Result<Option<Perm>> {
    let ancestors = index.ancestors_of_path(path)?;
    Ok(resolve_perm(ctx, &ancestors, grants))
}

/// Whether `current` satisfies `required`.
///
/// `None` never satisfies anything; otherwise rank comparison.
pub fn has_at_least(current: Option<Perm>, required: Perm) -> bool {
    current.is_some_and(|p| p >= required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use elara_core::{EmpresaId, Nivel, Principal, UserId, UserTipo};

    fn chain() -> Vec<ResourceNode> {
        let root = ResourceNode::root("root", "P1", "obra");
        let fin = ResourceNode::child("fin", &root, "finanzas");
        vec![fin, root]
    }

    fn ctx() -> Context {
        Context::new("U1", UserTipo::Gerencia, Nivel::Usuario)
    }

    fn allow(id: &str, resource: &str, principal: Principal, perm: Perm) -> Grant {
        Grant::allow(id, "P1", resource, principal, perm)
    }

    #[test]
    fn test_no_applicable_grant_is_none() {
        let nodes = chain();
        let ancestors: Vec<&ResourceNode> = nodes.iter().collect();
        let grants = vec![allow(
            "G1",
            "root",
            Principal::Nivel(Nivel::Administrador),
            Perm::Edit,
        )];

        // ctx.nivel is Usuario, so the Administrador grant does not apply.
        assert_eq!(resolve_perm(&ctx(), &ancestors, &grants), None);
    }

    #[test]
    fn test_grant_off_chain_is_ignored() {
        let nodes = chain();
        let ancestors: Vec<&ResourceNode> = nodes.iter().collect();
        let grants = vec![allow(
            "G1",
            "elsewhere",
            Principal::User(UserId::new("U1")),
            Perm::Admin,
        )];

        assert_eq!(resolve_perm(&ctx(), &ancestors, &grants), None);
    }

    #[test]
    fn test_max_rank_wins_among_allows() {
        let nodes = chain();
        let ancestors: Vec<&ResourceNode> = nodes.iter().collect();
        let grants = vec![
            allow("G1", "fin", Principal::User(UserId::new("U1")), Perm::View),
            // The higher rank sits on the less specific ancestor and still
            // wins: allow-combination ignores specificity.
            allow("G2", "root", Principal::Tipo(UserTipo::Gerencia), Perm::Admin),
        ];

        assert_eq!(resolve_perm(&ctx(), &ancestors, &grants), Some(Perm::Admin));
    }

    #[test]
    fn test_deny_overrides_more_specific_allow() {
        let nodes = chain();
        let ancestors: Vec<&ResourceNode> = nodes.iter().collect();
        let grants = vec![
            allow("G1", "fin", Principal::User(UserId::new("U1")), Perm::Admin),
            Grant::deny(
                "G2",
                "P1",
                "root",
                Principal::Tipo(UserTipo::Gerencia),
                Perm::View,
            ),
        ];

        // The deny sits on the distant ancestor and at the lowest rank,
        // and still blocks everything.
        assert_eq!(resolve_perm(&ctx(), &ancestors, &grants), None);
    }

    #[test]
    fn test_deny_on_leaf_blocks_root_allow() {
        let nodes = chain();
        let ancestors: Vec<&ResourceNode> = nodes.iter().collect();
        let grants = vec![
            allow("G1", "root", Principal::User(UserId::new("U1")), Perm::Edit),
            Grant::deny(
                "G2",
                "P1",
                "fin",
                Principal::User(UserId::new("U1")),
                Perm::Edit,
            ),
        ];

        assert_eq!(resolve_perm(&ctx(), &ancestors, &grants), None);
    }

    #[test]
    fn test_non_applicable_deny_does_not_block() {
        let nodes = chain();
        let ancestors: Vec<&ResourceNode> = nodes.iter().collect();
        let grants = vec![
            allow("G1", "root", Principal::User(UserId::new("U1")), Perm::Edit),
            Grant::deny(
                "G2",
                "P1",
                "fin",
                Principal::User(UserId::new("U2")),
                Perm::Edit,
            ),
        ];

        assert_eq!(resolve_perm(&ctx(), &ancestors, &grants), Some(Perm::Edit));
    }

    #[test]
    fn empresa_empty_id_matches_context_without_empresa() {
        let nodes = chain();
        let ancestors: Vec<&ResourceNode> = nodes.iter().collect();
        let grants = vec![allow(
            "G1",
            "root",
            Principal::Empresa(EmpresaId::default()),
            Perm::View,
        )];

        // A context without an empresa matches the empty-id empresa grant.
        assert_eq!(resolve_perm(&ctx(), &ancestors, &grants), Some(Perm::View));

        // The same grant does not cover an affiliated context.
        let affiliated = ctx().with_empresa("E1");
        assert_eq!(resolve_perm(&affiliated, &ancestors, &grants), None);
    }

    #[test]
    fn test_resolve_at_path_unknown_path_fails_closed() {
        let index = ResourceIndex::build(chain()).unwrap();
        let grants = vec![allow(
            "G1",
            "root",
            Principal::User(UserId::new("U1")),
            Perm::Admin,
        )];

        let perm = resolve_at_path(&index, &ctx(), "obra/nada", &grants).unwrap();
        assert_eq!(perm, None);

        let perm = resolve_at_path(&index, &ctx(), "obra/finanzas", &grants).unwrap();
        assert_eq!(perm, Some(Perm::Admin));
    }

    #[test]
    fn test_has_at_least() {
        assert!(has_at_least(Some(Perm::Admin), Perm::View));
        assert!(has_at_least(Some(Perm::Edit), Perm::Edit));
        assert!(!has_at_least(Some(Perm::View), Perm::Edit));
        assert!(!has_at_least(None, Perm::View));
    }

    #[test]
    fn test_gerencia_nivel_mismatch_scenario() {
        // ctx={U1, Gerencia, Usuario}, ancestors=[fin, root],
        // one edit grant for nivel Administrador on root: nothing applies.
        let nodes = chain();
        let ancestors: Vec<&ResourceNode> = nodes.iter().collect();
        let grants = vec![allow(
            "G1",
            "root",
            Principal::Nivel(Nivel::Administrador),
            Perm::Edit,
        )];

        let ctx = Context::new("U1", UserTipo::Gerencia, Nivel::Usuario);
        assert_eq!(resolve_perm(&ctx, &ancestors, &grants), None);
        assert!(!has_at_least(resolve_perm(&ctx, &ancestors, &grants), Perm::View));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn perm() -> impl Strategy<Value = Perm> {
            prop_oneof![Just(Perm::View), Just(Perm::Edit), Just(Perm::Admin)]
        }

        proptest! {
            #[test]
            fn has_at_least_is_monotonic(p in proptest::option::of(perm())) {
                // Anything that satisfies edit also satisfies view.
                if has_at_least(p, Perm::Edit) {
                    prop_assert!(has_at_least(p, Perm::View));
                }
                if has_at_least(p, Perm::Admin) {
                    prop_assert!(has_at_least(p, Perm::Edit));
                }
            }

            #[test]
            fn deny_dominates_any_allow_set(ranks in proptest::collection::vec(perm(), 0..8)) {
                let nodes = chain();
                let ancestors: Vec<&ResourceNode> = nodes.iter().collect();
                let ctx = ctx();

                let mut grants: Vec<Grant> = ranks
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        allow(&format!("G{i}"), "fin", Principal::User(UserId::new("U1")), *p)
                    })
                    .collect();
                grants.push(Grant::deny(
                    "GD",
                    "P1",
                    "root",
                    Principal::User(UserId::new("U1")),
                    Perm::View,
                ));

                prop_assert_eq!(resolve_perm(&ctx, &ancestors, &grants), None);
            }

            #[test]
            fn allow_resolution_is_max_rank(ranks in proptest::collection::vec(perm(), 1..8)) {
                let nodes = chain();
                let ancestors: Vec<&ResourceNode> = nodes.iter().collect();
                let ctx = ctx();

                let grants: Vec<Grant> = ranks
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        // Alternate between the two ancestors; position
                        // must not affect the outcome.
                        let resource = if i % 2 == 0 { "fin" } else { "root" };
                        allow(&format!("G{i}"), resource, Principal::User(UserId::new("U1")), *p)
                    })
                    .collect();

                let expected = ranks.iter().copied().max();
                prop_assert_eq!(resolve_perm(&ctx, &ancestors, &grants), expected);
            }
        }
    }
}
