//! Golden scenario vectors for the payment-request classifier.
//!
//! Every port of the classifier must produce identical derived state for
//! these records. The vectors are serde-shaped so they can be exported
//! and replayed against other implementations.

use serde::{Deserialize, Serialize};

use elara_pagos::{classify, Estado, EstadoPago, PaymentRequest};

/// A single golden scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioVector {
    pub name: String,

    // Inputs
    pub vobo_desarrollador: bool,
    pub vobo_finanzas: bool,
    pub monto_pagado: f64,
    pub total: f64,
    pub stored_estado: Option<Estado>,
    pub stored_estatus_pago: Option<EstadoPago>,

    // Expected derived outputs
    pub estado: Estado,
    pub estado_pago: EstadoPago,
    pub porcentaje: f64,
    pub descripcion: String,
    pub puede_aprobar: bool,
    pub puede_pagar: bool,
}

impl ScenarioVector {
    /// Reconstruct the input record.
    pub fn record(&self) -> PaymentRequest {
        let mut req = PaymentRequest::new("S-vector", "P-vector", self.total);
        req.vobo_desarrollador = self.vobo_desarrollador;
        req.vobo_finanzas = self.vobo_finanzas;
        req.monto_pagado = self.monto_pagado;
        req.estado = self.stored_estado;
        req.estatus_pago = self.stored_estatus_pago;
        req
    }

    /// Whether the classifier reproduces the expected outputs.
    pub fn check(&self) -> bool {
        let c = classify(&self.record());
        c.estado == self.estado
            && c.estado_pago == self.estado_pago
            && (c.porcentaje - self.porcentaje).abs() < 1e-9
            && c.descripcion == self.descripcion
            && c.puede_aprobar == self.puede_aprobar
            && c.puede_pagar == self.puede_pagar
    }
}

/// The canonical scenario set.
pub fn scenario_vectors() -> Vec<ScenarioVector> {
    vec![
        ScenarioVector {
            name: "fresh".into(),
            vobo_desarrollador: false,
            vobo_finanzas: false,
            monto_pagado: 0.0,
            total: 1000.0,
            stored_estado: None,
            stored_estatus_pago: None,
            estado: Estado::Pendiente,
            estado_pago: EstadoPago::NoPagado,
            porcentaje: 0.0,
            descripcion: "Pendiente de Vo.Bo. de Desarrollador y Finanzas".into(),
            puede_aprobar: true,
            puede_pagar: false,
        },
        ScenarioVector {
            name: "only-dev-signed".into(),
            vobo_desarrollador: true,
            vobo_finanzas: false,
            monto_pagado: 0.0,
            total: 1000.0,
            stored_estado: None,
            stored_estatus_pago: None,
            estado: Estado::Pendiente,
            estado_pago: EstadoPago::NoPagado,
            porcentaje: 0.0,
            descripcion: "Pendiente de Vo.Bo. de Finanzas".into(),
            puede_aprobar: true,
            puede_pagar: false,
        },
        ScenarioVector {
            name: "approved-partial-payment".into(),
            vobo_desarrollador: true,
            vobo_finanzas: true,
            monto_pagado: 500.0,
            total: 1000.0,
            stored_estado: None,
            stored_estatus_pago: None,
            estado: Estado::Aprobada,
            estado_pago: EstadoPago::PagadoParcialmente,
            porcentaje: 50.0,
            descripcion: "Pago parcial realizado".into(),
            puede_aprobar: false,
            puede_pagar: true,
        },
        ScenarioVector {
            name: "paid-overrides-rechazada".into(),
            vobo_desarrollador: false,
            vobo_finanzas: false,
            monto_pagado: 1000.0,
            total: 1000.0,
            stored_estado: Some(Estado::Rechazada),
            stored_estatus_pago: None,
            estado: Estado::Pagada,
            estado_pago: EstadoPago::Pagado,
            porcentaje: 100.0,
            descripcion: "Pago completado".into(),
            puede_aprobar: false,
            puede_pagar: false,
        },
        ScenarioVector {
            name: "stored-pagado-marker".into(),
            vobo_desarrollador: true,
            vobo_finanzas: false,
            monto_pagado: 0.0,
            total: 1000.0,
            stored_estado: None,
            stored_estatus_pago: Some(EstadoPago::Pagado),
            estado: Estado::Pagada,
            estado_pago: EstadoPago::NoPagado,
            porcentaje: 0.0,
            descripcion: "Pago completado".into(),
            puede_aprobar: false,
            puede_pagar: false,
        },
        ScenarioVector {
            name: "rejected".into(),
            vobo_desarrollador: true,
            vobo_finanzas: true,
            monto_pagado: 0.0,
            total: 1000.0,
            stored_estado: Some(Estado::Rechazada),
            stored_estatus_pago: None,
            estado: Estado::Rechazada,
            estado_pago: EstadoPago::NoPagado,
            porcentaje: 0.0,
            descripcion: "Solicitud rechazada".into(),
            puede_aprobar: false,
            puede_pagar: false,
        },
        ScenarioVector {
            name: "zero-total".into(),
            vobo_desarrollador: false,
            vobo_finanzas: true,
            monto_pagado: 0.0,
            total: 0.0,
            stored_estado: None,
            stored_estatus_pago: None,
            estado: Estado::Pendiente,
            estado_pago: EstadoPago::NoPagado,
            porcentaje: 0.0,
            descripcion: "Pendiente de Vo.Bo. de Desarrollador".into(),
            puede_aprobar: true,
            puede_pagar: false,
        },
    ]
}
