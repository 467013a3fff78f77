use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::engine::LoanSchedule;

/// Format an amount as US dollars with thousands separators.
pub fn format_currency(amount: Decimal, fraction_digits: u32) -> String {
    let rounded =
        amount.round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let abs = rounded.abs();
    let whole = abs.trunc();
    let digits = whole.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&grouped);

    if fraction_digits > 0 {
        let mut frac = (abs - whole).to_string();
        // "0.5" -> "5", then pad to the requested width
        frac = frac.trim_start_matches('0').trim_start_matches('.').to_string();
        while frac.len() < fraction_digits as usize {
            frac.push('0');
        }
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Rows of the calculator's summary table, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySummary {
    pub principal_payment: String,
    pub interest_payment: String,
    pub monthly_payment: String,
    pub total_payments: String,
    pub total_interest: String,
}

impl DisplaySummary {
    pub fn from_schedule(schedule: &LoanSchedule) -> Self {
        Self {
            principal_payment: format_currency(schedule.monthly_principal, 0),
            interest_payment: format_currency(schedule.monthly_interest, 0),
            monthly_payment: format_currency(schedule.monthly_payment, 0),
            total_payments: format_currency(schedule.total_paid, 0),
            total_interest: format_currency(schedule.total_interest, 0),
        }
    }

    /// Label/value pairs in display order.
    pub fn rows(&self) -> [(&'static str, &str); 5] {
        [
            ("Principal payment", &self.principal_payment),
            ("Interest payment", &self.interest_payment),
            ("Monthly payment", &self.monthly_payment),
            ("Total payments", &self.total_payments),
            ("Total interest", &self.total_interest),
        ]
    }
}
