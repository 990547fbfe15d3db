//! Payment-request records and state classification.
//!
//! The discrete state of a payment request is never authoritative in
//! storage: it is a pure function of the raw sign-off and payment fields,
//! recomputed on every read. The stored `estado`/`estatus_pago` columns
//! are a denormalized cache that the write path refreshes — with one
//! deliberate exception: a stored `rechazada` flag and a stored `PAGADO`
//! marker are themselves inputs to the classification, in the precedence
//! spelled out in [`classify`].

use serde::{Deserialize, Serialize};
use std::fmt;

use elara_core::{ProjectId, RequestId};

use crate::error::PagosError;

/// Discrete state of a payment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estado {
    Pendiente,
    Aprobada,
    Pagada,
    Rechazada,
}

impl Estado {
    /// The wire string used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Estado::Pendiente => "pendiente",
            Estado::Aprobada => "aprobada",
            Estado::Pagada => "pagada",
            Estado::Rechazada => "rechazada",
        }
    }

    /// Parse a wire string.
    pub fn parse(s: &str) -> Result<Self, PagosError> {
        match s {
            "pendiente" => Ok(Estado::Pendiente),
            "aprobada" => Ok(Estado::Aprobada),
            "pagada" => Ok(Estado::Pagada),
            "rechazada" => Ok(Estado::Rechazada),
            other => Err(PagosError::UnknownEstado(other.to_string())),
        }
    }

    /// Whether the state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Estado::Pagada)
    }
}

impl fmt::Display for Estado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment sub-status, derived from amounts alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstadoPago {
    #[serde(rename = "NO PAGADO")]
    NoPagado,
    #[serde(rename = "PAGADO PARCIALMENTE")]
    PagadoParcialmente,
    #[serde(rename = "PAGADO")]
    Pagado,
}

impl EstadoPago {
    /// The wire string used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoPago::NoPagado => "NO PAGADO",
            EstadoPago::PagadoParcialmente => "PAGADO PARCIALMENTE",
            EstadoPago::Pagado => "PAGADO",
        }
    }

    /// Parse a wire string.
    pub fn parse(s: &str) -> Result<Self, PagosError> {
        match s {
            "NO PAGADO" => Ok(EstadoPago::NoPagado),
            "PAGADO PARCIALMENTE" => Ok(EstadoPago::PagadoParcialmente),
            "PAGADO" => Ok(EstadoPago::Pagado),
            other => Err(PagosError::UnknownEstadoPago(other.to_string())),
        }
    }
}

impl fmt::Display for EstadoPago {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The approval sign-off arms of a payment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoboRole {
    Desarrollador,
    Finanzas,
}

/// A payment request (solicitud de pago), as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Row id.
    pub id: RequestId,

    /// The project the request belongs to.
    pub project_id: ProjectId,

    /// Human-facing folio, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folio: Option<String>,

    /// Developer sign-off.
    pub vobo_desarrollador: bool,

    /// Finance sign-off.
    pub vobo_finanzas: bool,

    /// Amount disbursed so far.
    pub monto_pagado: f64,

    /// Total amount requested.
    pub total: f64,

    /// Cached payment sub-status, refreshed by the write path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estatus_pago: Option<EstadoPago>,

    /// Cached discrete state, refreshed by the write path. A stored
    /// `rechazada` survives reclassification until the request is
    /// reopened or paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<Estado>,
}

impl PaymentRequest {
    /// Create a fresh, unsigned, unpaid request.
    pub fn new(
        id: impl Into<RequestId>,
        project_id: impl Into<ProjectId>,
        total: f64,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            folio: None,
            vobo_desarrollador: false,
            vobo_finanzas: false,
            monto_pagado: 0.0,
            total,
            estatus_pago: None,
            estado: None,
        }
    }

    /// Assign a folio.
    pub fn with_folio(mut self, folio: impl Into<String>) -> Self {
        self.folio = Some(folio.into());
        self
    }

    /// Whether both sign-offs are present.
    pub fn tiene_ambos_vobos(&self) -> bool {
        self.vobo_desarrollador && self.vobo_finanzas
    }

    /// Read one sign-off arm.
    pub fn vobo(&self, role: VoboRole) -> bool {
        match role {
            VoboRole::Desarrollador => self.vobo_desarrollador,
            VoboRole::Finanzas => self.vobo_finanzas,
        }
    }

    /// Write one sign-off arm.
    pub fn set_vobo(&mut self, role: VoboRole, value: bool) {
        match role {
            VoboRole::Desarrollador => self.vobo_desarrollador = value,
            VoboRole::Finanzas => self.vobo_finanzas = value,
        }
    }
}

/// Everything the UI needs to render a payment request's status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Discrete state.
    pub estado: Estado,

    /// Payment sub-status.
    pub estado_pago: EstadoPago,

    /// Percentage paid, 0 when the total is zero.
    pub porcentaje: f64,

    /// Human-readable status line.
    pub descripcion: String,

    /// Whether an approval action is offered.
    pub puede_aprobar: bool,

    /// Whether a payment-registration action is offered.
    pub puede_pagar: bool,
}

/// Payment sub-status from amounts alone: unpaid, partial, or paid.
pub fn pay_status(req: &PaymentRequest) -> EstadoPago {
    if req.monto_pagado == 0.0 {
        EstadoPago::NoPagado
    } else if req.monto_pagado >= req.total {
        EstadoPago::Pagado
    } else {
        EstadoPago::PagadoParcialmente
    }
}

/// Classify a payment request.
///
/// Precedence, first match wins:
///
/// 1. paid — the amounts say `PAGADO`, or the stored marker does. A
///    payment already made outranks even a stored `rechazada`.
/// 2. rejected — the stored `estado` is `rechazada`.
/// 3. approved — both sign-offs present.
/// 4. pending — anything else, with a description naming the missing
///    sign-offs.
///
/// Pure and idempotent: the input is never mutated, and the same record
/// always classifies identically.
pub fn classify(req: &PaymentRequest) -> Classification {
    let estado_pago = pay_status(req);
    let porcentaje = if req.total > 0.0 {
        req.monto_pagado / req.total * 100.0
    } else {
        0.0
    };

    let pagada = estado_pago == EstadoPago::Pagado || req.estatus_pago == Some(EstadoPago::Pagado);

    let estado = if pagada {
        Estado::Pagada
    } else if req.estado == Some(Estado::Rechazada) {
        Estado::Rechazada
    } else if req.tiene_ambos_vobos() {
        Estado::Aprobada
    } else {
        Estado::Pendiente
    };

    let descripcion = match estado {
        Estado::Pagada => "Pago completado".to_string(),
        Estado::Rechazada => "Solicitud rechazada".to_string(),
        Estado::Aprobada => match estado_pago {
            EstadoPago::PagadoParcialmente => "Pago parcial realizado".to_string(),
            _ => "Aprobada, pendiente de pago".to_string(),
        },
        Estado::Pendiente => {
            if !req.vobo_desarrollador && !req.vobo_finanzas {
                "Pendiente de Vo.Bo. de Desarrollador y Finanzas".to_string()
            } else if !req.vobo_desarrollador {
                "Pendiente de Vo.Bo. de Desarrollador".to_string()
            } else {
                "Pendiente de Vo.Bo. de Finanzas".to_string()
            }
        }
    };

    Classification {
        estado,
        estado_pago,
        porcentaje,
        descripcion,
        puede_aprobar: estado == Estado::Pendiente && !req.tiene_ambos_vobos(),
        puede_pagar: estado == Estado::Aprobada && estado_pago != EstadoPago::Pagado,
    }
}
