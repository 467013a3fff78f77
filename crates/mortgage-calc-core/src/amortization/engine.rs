//! Fixed-rate, fully amortizing loan payment engine.
//!
//! The monthly payment is the standard annuity payment. The principal and
//! interest split reported alongside it is a straight-line allocation
//! (`principal / payments`), which is what the marketplace calculator has
//! always displayed and what its principal/interest chart proportions are
//! built on. It is not the first-period split of a true amortization table;
//! see [`crate::amortization::table`] for that.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::MortgageError;
use crate::time_value::{annuity_payment, monthly_rate, payment_count};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate, Years};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan parameters for one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal annual rate in percent (4.5 = 4.5%).
    #[serde(alias = "annualRatePercent")]
    pub annual_rate_percent: Percent,
    /// Loan duration in years.
    #[serde(alias = "termYears")]
    pub term_years: Years,
}

impl LoanInputs {
    pub fn new(principal: Money, annual_rate_percent: Percent, term_years: Years) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
        }
    }

    /// Reject inputs the payment formula is undefined for.
    pub fn validate(&self) -> MortgageResult<()> {
        if self.principal < Decimal::ZERO {
            return Err(MortgageError::invalid(
                "principal",
                "Principal cannot be negative",
            ));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(MortgageError::invalid(
                "annual_rate_percent",
                "Annual rate cannot be negative",
            ));
        }
        if self.term_years <= Decimal::ZERO {
            return Err(MortgageError::invalid(
                "term_years",
                "Term must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn monthly_rate(&self) -> Rate {
        monthly_rate(self.annual_rate_percent)
    }

    pub fn payment_count(&self) -> MortgageResult<Decimal> {
        payment_count(self.term_years)
    }
}

/// Payment summary derived from [`LoanInputs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub monthly_payment: Money,
    /// Straight-line share of principal in each payment.
    pub monthly_principal: Money,
    /// `monthly_payment - monthly_principal`. Not clamped.
    pub monthly_interest: Money,
    pub total_paid: Money,
    pub total_interest: Money,
}

/// Principal/interest proportion of the monthly payment, for chart display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub principal_share: Option<Decimal>,
    pub interest_share: Option<Decimal>,
}

/// A result that is arithmetically well defined but misleading to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumericAnomaly {
    /// Straight-line principal exceeds the annuity payment.
    NegativeMonthlyInterest { monthly_interest: Decimal },
    /// A field came out as NaN or infinite (permissive mode only).
    NonFinite { field: String },
}

impl fmt::Display for NumericAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericAnomaly::NegativeMonthlyInterest { monthly_interest } => write!(
                f,
                "Monthly interest is negative ({monthly_interest}); the straight-line principal \
                 split exceeds the payment"
            ),
            NumericAnomaly::NonFinite { field } => write!(f, "{field} is not a finite number"),
        }
    }
}

/// Full result of [`analyze_loan`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub schedule: LoanSchedule,
    pub breakdown: PaymentBreakdown,
    pub anomalies: Vec<NumericAnomaly>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fixed monthly payment for a fully amortizing loan.
pub fn compute_monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: Years,
) -> MortgageResult<Money> {
    let inputs = LoanInputs::new(principal, annual_rate_percent, term_years);
    inputs.validate()?;
    monthly_payment_unchecked(&inputs)
}

/// Monthly payment plus the straight-line split and lifetime totals.
pub fn compute_schedule(inputs: &LoanInputs) -> MortgageResult<LoanSchedule> {
    inputs.validate()?;

    let monthly_payment = monthly_payment_unchecked(inputs)?;
    let payments = inputs.payment_count()?;

    let monthly_principal = inputs
        .principal
        .checked_div(payments)
        .ok_or_else(|| MortgageError::overflow("straight-line principal"))?;
    let monthly_interest = monthly_payment - monthly_principal;
    let total_paid = monthly_payment
        .checked_mul(payments)
        .ok_or_else(|| MortgageError::overflow("total paid"))?;
    let total_interest = total_paid - inputs.principal;

    debug!(
        principal = %inputs.principal,
        rate = %inputs.annual_rate_percent,
        years = %inputs.term_years,
        payment = %monthly_payment,
        "computed loan schedule"
    );

    Ok(LoanSchedule {
        monthly_payment,
        monthly_principal,
        monthly_interest,
        total_paid,
        total_interest,
    })
}

/// Post-hoc checks on a computed schedule.
pub fn diagnose(schedule: &LoanSchedule) -> Vec<NumericAnomaly> {
    let mut anomalies = Vec::new();
    if schedule.monthly_interest < Decimal::ZERO {
        anomalies.push(NumericAnomaly::NegativeMonthlyInterest {
            monthly_interest: schedule.monthly_interest,
        });
    }
    anomalies
}

pub fn payment_breakdown(schedule: &LoanSchedule) -> PaymentBreakdown {
    if schedule.monthly_payment.is_zero() {
        return PaymentBreakdown {
            principal_share: None,
            interest_share: None,
        };
    }
    PaymentBreakdown {
        principal_share: Some(schedule.monthly_principal / schedule.monthly_payment),
        interest_share: Some(schedule.monthly_interest / schedule.monthly_payment),
    }
}

/// Compute a schedule and wrap it with its breakdown, diagnostics and metadata.
pub fn analyze_loan(inputs: &LoanInputs) -> MortgageResult<ComputationOutput<LoanAnalysis>> {
    let start = Instant::now();

    let schedule = compute_schedule(inputs)?;
    let breakdown = payment_breakdown(&schedule);
    let anomalies = diagnose(&schedule);

    let mut warnings: Vec<String> = Vec::new();
    for anomaly in &anomalies {
        warn!(%anomaly, "numeric anomaly in loan schedule");
        warnings.push(anomaly.to_string());
    }
    if inputs.annual_rate_percent.is_zero() && !inputs.principal.is_zero() {
        warnings.push("Zero interest rate: payment is principal divided evenly".into());
    }

    let methodology = if inputs.annual_rate_percent.is_zero() {
        "Straight-line repayment (zero rate)"
    } else {
        "Fixed-rate annuity payment, straight-line principal split"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        inputs,
        warnings,
        elapsed,
        LoanAnalysis {
            schedule,
            breakdown,
            anomalies,
        },
    ))
}

fn monthly_payment_unchecked(inputs: &LoanInputs) -> MortgageResult<Money> {
    annuity_payment(inputs.principal, inputs.monthly_rate(), inputs.payment_count()?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
