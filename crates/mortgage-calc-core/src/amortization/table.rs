//! Period-by-period amortization table.
//!
//! Unlike the summary in [`super::engine`], each row splits the payment the
//! way the lender actually applies it: interest accrues on the outstanding
//! balance and the remainder of the payment retires principal.

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::engine::{compute_monthly_payment, LoanInputs};
use crate::error::MortgageError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

/// Longest table we will materialise (100 years of monthly payments).
const MAX_PERIODS: u32 = 1200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationTableInput {
    #[serde(flatten)]
    pub loan: LoanInputs,
    /// Loan origination date; the first payment falls due one month later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationTable {
    pub monthly_payment: Money,
    pub rows: Vec<AmortizationRow>,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Principal retired by the first payment.
    pub first_period_principal: Money,
}

pub fn build_amortization_table(
    input: &AmortizationTableInput,
) -> MortgageResult<ComputationOutput<AmortizationTable>> {
    let start = Instant::now();
    let loan = &input.loan;

    let payment = compute_monthly_payment(loan.principal, loan.annual_rate_percent, loan.term_years)?;
    let periods = whole_periods(loan.payment_count()?)?;
    let rate = loan.monthly_rate();

    let mut rows = Vec::with_capacity(periods as usize);
    let mut balance = loan.principal;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;

    for period in 1..=periods {
        let interest = balance * rate;
        let (principal, this_payment) = if period == periods {
            // Last payment retires whatever rounding left behind.
            (balance, balance + interest)
        } else {
            (payment - interest, payment)
        };
        balance -= principal;

        let due_date = match input.start_date {
            Some(d) => Some(d.checked_add_months(Months::new(period)).ok_or_else(|| {
                MortgageError::invalid("start_date", "Payment dates run past the calendar range")
            })?),
            None => None,
        };

        total_paid = total_paid
            .checked_add(this_payment)
            .ok_or_else(|| MortgageError::overflow("amortization total paid"))?;
        total_interest = total_interest
            .checked_add(interest)
            .ok_or_else(|| MortgageError::overflow("amortization total interest"))?;
        rows.push(AmortizationRow {
            period,
            due_date,
            payment: this_payment,
            principal,
            interest,
            balance,
        });
    }

    let first_period_principal = rows.first().map(|r| r.principal).unwrap_or_default();

    let mut warnings = Vec::new();
    if let Some(last) = rows.last() {
        let drift = (last.payment - payment).abs();
        if drift > Decimal::new(1, 2) {
            warnings.push(format!(
                "Final payment differs from the level payment by {drift}"
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization, interest on outstanding balance",
        input,
        warnings,
        elapsed,
        AmortizationTable {
            monthly_payment: payment,
            rows,
            total_paid,
            total_interest,
            first_period_principal,
        },
    ))
}

fn whole_periods(count: Decimal) -> MortgageResult<u32> {
    if count.fract() != Decimal::ZERO {
        return Err(MortgageError::invalid(
            "term_years",
            "Amortization table needs a whole number of monthly payments",
        ));
    }
    match count.to_u32() {
        Some(n) if n <= MAX_PERIODS => Ok(n),
        _ => Err(MortgageError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Amortization table is limited to {MAX_PERIODS} payments"),
        }),
    }
}
