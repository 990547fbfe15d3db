//! Legal state transitions for payment requests.
//!
//! The table gates write actions; it is advisory in the sense that the
//! classifier itself never consults it — a record mutated by another actor
//! still classifies deterministically. Enforcement happens on the write
//! path of whoever owns the mutation.

use crate::error::{PagosError, Result};
use crate::estado::{Estado, PaymentRequest};

/// Whether `from -> to` is a legal transition for the given record.
///
/// The record supplies the sign-off flags the conditional arms depend on:
///
/// - pendiente -> aprobada requires both sign-offs;
/// - aprobada -> pendiente requires a withdrawn sign-off;
/// - pagada is terminal;
/// - staying in place is always legal.
pub fn can_transition(from: Estado, to: Estado, req: &PaymentRequest) -> bool {
    if from == to {
        return true;
    }

    match (from, to) {
        (Estado::Pendiente, Estado::Aprobada) => req.tiene_ambos_vobos(),
        (Estado::Pendiente, Estado::Rechazada) => true,
        (Estado::Aprobada, Estado::Pagada) => true,
        (Estado::Aprobada, Estado::Pendiente) => !req.tiene_ambos_vobos(),
        (Estado::Rechazada, Estado::Pendiente) => true,
        _ => false,
    }
}

/// The states legally reachable from `from` for the given record.
///
/// Does not include staying in place.
pub fn allowed_transitions(from: Estado, req: &PaymentRequest) -> Vec<Estado> {
    [
        Estado::Pendiente,
        Estado::Aprobada,
        Estado::Pagada,
        Estado::Rechazada,
    ]
    .into_iter()
    .filter(|&to| to != from && can_transition(from, to, req))
    .collect()
}

/// Check a transition, failing with [`PagosError::IllegalTransition`].
pub fn check_transition(from: Estado, to: Estado, req: &PaymentRequest) -> Result<()> {
    if can_transition(from, to, req) {
        Ok(())
    } else {
        Err(PagosError::IllegalTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed(both: bool) -> PaymentRequest {
        let mut r = PaymentRequest::new("S1", "P1", 1000.0);
        r.vobo_desarrollador = both;
        r.vobo_finanzas = both;
        r
    }

    #[test]
    fn test_pendiente_to_aprobada_needs_both_vobos() {
        assert!(can_transition(Estado::Pendiente, Estado::Aprobada, &signed(true)));
        assert!(!can_transition(Estado::Pendiente, Estado::Aprobada, &signed(false)));

        let mut one = signed(false);
        one.vobo_finanzas = true;
        assert!(!can_transition(Estado::Pendiente, Estado::Aprobada, &one));
    }

    #[test]
    fn test_pendiente_can_always_be_rejected() {
        assert!(can_transition(Estado::Pendiente, Estado::Rechazada, &signed(false)));
        assert!(can_transition(Estado::Pendiente, Estado::Rechazada, &signed(true)));
    }

    #[test]
    fn test_aprobada_exits() {
        assert!(can_transition(Estado::Aprobada, Estado::Pagada, &signed(true)));
        // Back to pendiente only once a sign-off is withdrawn.
        assert!(!can_transition(Estado::Aprobada, Estado::Pendiente, &signed(true)));
        assert!(can_transition(Estado::Aprobada, Estado::Pendiente, &signed(false)));
        assert!(!can_transition(Estado::Aprobada, Estado::Rechazada, &signed(true)));
    }

    #[test]
    fn test_pagada_is_terminal() {
        for to in [Estado::Pendiente, Estado::Aprobada, Estado::Rechazada] {
            assert!(!can_transition(Estado::Pagada, to, &signed(true)));
        }
        assert!(allowed_transitions(Estado::Pagada, &signed(true)).is_empty());
    }

    #[test]
    fn test_rechazada_reopens_only_to_pendiente() {
        assert!(can_transition(Estado::Rechazada, Estado::Pendiente, &signed(false)));
        assert!(!can_transition(Estado::Rechazada, Estado::Aprobada, &signed(true)));
        assert!(!can_transition(Estado::Rechazada, Estado::Pagada, &signed(true)));
    }

    #[test]
    fn test_allowed_transitions_enumeration() {
        assert_eq!(
            allowed_transitions(Estado::Pendiente, &signed(true)),
            vec![Estado::Aprobada, Estado::Rechazada]
        );
        assert_eq!(
            allowed_transitions(Estado::Pendiente, &signed(false)),
            vec![Estado::Rechazada]
        );
        assert_eq!(
            allowed_transitions(Estado::Aprobada, &signed(true)),
            vec![Estado::Pagada]
        );
        assert_eq!(
            allowed_transitions(Estado::Rechazada, &signed(true)),
            vec![Estado::Pendiente]
        );
    }

    #[test]
    fn test_check_transition_error_carries_endpoints() {
        let err = check_transition(Estado::Pagada, Estado::Pendiente, &signed(true)).unwrap_err();
        assert!(matches!(
            err,
            PagosError::IllegalTransition { from: Estado::Pagada, to: Estado::Pendiente }
        ));
    }
}
