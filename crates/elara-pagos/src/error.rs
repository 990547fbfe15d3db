//! Error types for the pagos module.

use thiserror::Error;

use crate::estado::Estado;

/// Errors that can occur during payment-request operations.
#[derive(Debug, Error)]
pub enum PagosError {
    /// A state jump outside the legal transition table.
    #[error("illegal transition: {from} -> {to}")]
    IllegalTransition {
        /// State the record was in.
        from: Estado,
        /// State the mutation would land on.
        to: Estado,
    },

    /// A percentage outside 0..=100.
    #[error("percentage out of range: {0}")]
    PercentageOutOfRange(f64),

    /// A negative money amount.
    #[error("negative amount: {0}")]
    NegativeAmount(f64),

    /// Combined anticipo + retención exceeding the full amount.
    #[error("deductions exceed amount: {0}%")]
    DeductionsExceedAmount(f64),

    /// An estado string outside pendiente|aprobada|pagada|rechazada.
    #[error("unknown estado: {0}")]
    UnknownEstado(String),

    /// An estatus de pago string outside the known set.
    #[error("unknown estatus de pago: {0}")]
    UnknownEstadoPago(String),
}

/// Result type for payment-request operations.
pub type Result<T> = std::result::Result<T, PagosError>;
