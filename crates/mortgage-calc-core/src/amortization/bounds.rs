//! Presentation bounds for the calculator's input controls.
//!
//! These are the slider ranges the marketplace front-end ships with. The
//! engine never enforces them; callers use [`InputBounds::check`] to flag
//! out-of-range values or [`InputBounds::clamp`] to pull them into range
//! before calculating.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::engine::LoanInputs;
use crate::error::MortgageError;
use crate::MortgageResult;

/// Closed range with a step, as rendered by a range slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBound {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

impl RangeBound {
    pub fn new(min: Decimal, max: Decimal, step: Decimal) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp into `[min, max]` and snap to the nearest step above `min`.
    pub fn clamp(&self, value: Decimal) -> Decimal {
        let bounded = value.max(self.min).min(self.max);
        if self.step <= Decimal::ZERO {
            return bounded;
        }
        let steps = ((bounded - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }

    fn validate(&self, field: &str) -> MortgageResult<()> {
        if self.min > self.max {
            return Err(MortgageError::InvalidInput {
                field: field.into(),
                reason: format!("min {} exceeds max {}", self.min, self.max),
            });
        }
        if self.step < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: field.into(),
                reason: "step cannot be negative".into(),
            });
        }
        Ok(())
    }
}

/// Ranges for the three calculator controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputBounds {
    pub principal: RangeBound,
    pub annual_rate_percent: RangeBound,
    pub term_years: RangeBound,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            principal: RangeBound::new(dec!(0), dec!(5_000_000), dec!(1000)),
            annual_rate_percent: RangeBound::new(dec!(0), dec!(10), dec!(0.01)),
            term_years: RangeBound::new(dec!(1), dec!(40), dec!(1)),
        }
    }
}

/// One input outside its configured range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundViolation {
    pub field: String,
    pub value: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

impl InputBounds {
    pub fn validate(&self) -> MortgageResult<()> {
        self.principal.validate("principal")?;
        self.annual_rate_percent.validate("annual_rate_percent")?;
        self.term_years.validate("term_years")
    }

    pub fn check(&self, inputs: &LoanInputs) -> Vec<BoundViolation> {
        [
            ("principal", &self.principal, inputs.principal),
            (
                "annual_rate_percent",
                &self.annual_rate_percent,
                inputs.annual_rate_percent,
            ),
            ("term_years", &self.term_years, inputs.term_years),
        ]
        .into_iter()
        .filter(|(_, bound, value)| !bound.contains(*value))
        .map(|(field, bound, value)| BoundViolation {
            field: field.to_string(),
            value,
            min: bound.min,
            max: bound.max,
        })
        .collect()
    }

    pub fn clamp(&self, inputs: &LoanInputs) -> LoanInputs {
        LoanInputs {
            principal: self.principal.clamp(inputs.principal),
            annual_rate_percent: self.annual_rate_percent.clamp(inputs.annual_rate_percent),
            term_years: self.term_years.clamp(inputs.term_years),
        }
    }
}
