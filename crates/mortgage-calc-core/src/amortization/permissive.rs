//! Unvalidated `f64` rendition of the payment engine.
//!
//! Mirrors the browser calculator bit for bit: no input checks, IEEE-754
//! arithmetic, and `NaN` / `inf` wherever the formula breaks down (a zero
//! term divides by zero, for instance). Only intended for comparing against
//! the legacy front-end; use [`super::engine`] for anything else.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::engine::NumericAnomaly;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PermissiveInputs {
    pub principal: f64,
    #[serde(alias = "annualRatePercent")]
    pub annual_rate_percent: f64,
    #[serde(alias = "termYears")]
    pub term_years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PermissiveSchedule {
    pub monthly_payment: f64,
    pub monthly_principal: f64,
    pub monthly_interest: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

impl PermissiveSchedule {
    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("monthly_payment", self.monthly_payment),
            ("monthly_principal", self.monthly_principal),
            ("monthly_interest", self.monthly_interest),
            ("total_paid", self.total_paid),
            ("total_interest", self.total_interest),
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_finite())
    }

    pub fn anomalies(&self) -> Vec<NumericAnomaly> {
        let mut anomalies: Vec<NumericAnomaly> = self
            .fields()
            .iter()
            .filter(|(_, v)| !v.is_finite())
            .map(|(name, _)| NumericAnomaly::NonFinite {
                field: (*name).to_string(),
            })
            .collect();

        if self.monthly_interest < 0.0 {
            if let Some(monthly_interest) = Decimal::from_f64(self.monthly_interest) {
                anomalies.push(NumericAnomaly::NegativeMonthlyInterest { monthly_interest });
            }
        }
        anomalies
    }
}

pub fn compute_schedule_permissive(inputs: &PermissiveInputs) -> PermissiveSchedule {
    let monthly_rate = inputs.annual_rate_percent / 12.0 / 100.0;
    let payments = inputs.term_years * 12.0;

    let monthly_payment = if monthly_rate == 0.0 {
        inputs.principal / payments
    } else {
        inputs.principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-payments))
    };
    let monthly_principal = inputs.principal / payments;
    let total_paid = monthly_payment * payments;

    PermissiveSchedule {
        monthly_payment,
        monthly_principal,
        monthly_interest: monthly_payment - monthly_principal,
        total_paid,
        total_interest: total_paid - inputs.principal,
    }
}
