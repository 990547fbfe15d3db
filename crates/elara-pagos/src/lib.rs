//! # Elara Pagos
//!
//! Payment-request state derivation for the disbursement workflow.
//!
//! ## Overview
//!
//! A payment request carries two approval sign-offs (Desarrollador and
//! Finanzas), the requested total, and the amount disbursed so far. Its
//! discrete state — pendiente, aprobada, pagada, rechazada — is a pure
//! function of those fields, recomputed on every read rather than trusted
//! from storage. See [`classify`] for the exact precedence.
//!
//! ## Key Types
//!
//! - [`PaymentRequest`] - The raw record, as the backend stores it
//! - [`Estado`] / [`EstadoPago`] - Discrete state and payment sub-status
//! - [`Classification`] - Derived state plus UI affordances
//! - [`PaymentBreakdown`] - Amortización/retención split of a disbursement
//!
//! ## Usage
//!
//! ```rust
//! use elara_pagos::{classify, Estado, PaymentRequest};
//!
//! let mut solicitud = PaymentRequest::new("S1", "P1", 1000.0);
//! solicitud.vobo_desarrollador = true;
//! solicitud.vobo_finanzas = true;
//!
//! let c = classify(&solicitud);
//! assert_eq!(c.estado, Estado::Aprobada);
//! assert!(c.puede_pagar);
//! ```

pub mod breakdown;
pub mod error;
pub mod estado;
pub mod transition;

pub use breakdown::PaymentBreakdown;
pub use error::{PagosError, Result};
pub use estado::{classify, pay_status, Classification, Estado, EstadoPago, PaymentRequest, VoboRole};
pub use transition::{allowed_transitions, can_transition, check_transition};
