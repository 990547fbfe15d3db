//! Payment breakdown: amortización and retención.
//!
//! Every disbursement against a contract with an anticipo repays part of
//! the advance (amortización) and withholds a guarantee percentage
//! (retención). The breakdown is pure arithmetic over the gross amount,
//! validated up front so downstream code never sees a negative net.

use serde::{Deserialize, Serialize};

use crate::error::{PagosError, Result};

/// Split of one gross payment amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    /// Gross amount of the payment.
    pub monto: f64,

    /// Advance-repayment percentage applied.
    pub pct_anticipo: f64,

    /// Withholding percentage applied.
    pub pct_retencion: f64,

    /// Portion repaying the advance.
    pub amortizacion: f64,

    /// Portion withheld as guarantee.
    pub retencion: f64,

    /// Amount actually disbursed.
    pub neto: f64,
}

impl PaymentBreakdown {
    /// Compute the breakdown of a gross amount.
    ///
    /// Percentages must be within 0..=100 and must not sum past 100; the
    /// amount must not be negative.
    pub fn new(monto: f64, pct_anticipo: f64, pct_retencion: f64) -> Result<Self> {
        if monto < 0.0 {
            return Err(PagosError::NegativeAmount(monto));
        }
        for pct in [pct_anticipo, pct_retencion] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(PagosError::PercentageOutOfRange(pct));
            }
        }
        let combined = pct_anticipo + pct_retencion;
        if combined > 100.0 {
            return Err(PagosError::DeductionsExceedAmount(combined));
        }

        let amortizacion = monto * pct_anticipo / 100.0;
        let retencion = monto * pct_retencion / 100.0;

        Ok(Self {
            monto,
            pct_anticipo,
            pct_retencion,
            amortizacion,
            retencion,
            neto: monto - amortizacion - retencion,
        })
    }

    /// Breakdown with no deductions.
    pub fn gross(monto: f64) -> Result<Self> {
        Self::new(monto, 0.0, 0.0)
    }
}
