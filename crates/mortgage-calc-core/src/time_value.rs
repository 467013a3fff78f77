use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::MortgageError;
use crate::types::{Money, Percent, Rate, Years};
use crate::MortgageResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Periodic (monthly) rate from a nominal annual rate quoted in percent.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / MONTHS_PER_YEAR / dec!(100)
}

/// Number of monthly payments in a term. May be fractional.
pub fn payment_count(term_years: Years) -> MortgageResult<Decimal> {
    term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| MortgageError::overflow("payment count"))
}

/// Discount factor (1 + r)^-n.
///
/// Evaluated as v^n with v = 1 / (1 + r) so intermediate values shrink
/// towards zero instead of growing, which keeps long terms at high rates
/// inside the 96-bit mantissa. The integral part of `n` is raised by repeated
/// squaring, the fractional remainder with `powd`.
pub fn discount_factor(rate: Rate, periods: Decimal) -> MortgageResult<Decimal> {
    if rate <= dec!(-1) {
        return Err(MortgageError::invalid(
            "rate",
            "Periodic rate must be greater than -100%",
        ));
    }
    if periods < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "periods",
            "Number of periods cannot be negative",
        ));
    }
    if rate.is_zero() || periods.is_zero() {
        return Ok(Decimal::ONE);
    }

    let v = Decimal::ONE / (Decimal::ONE + rate);
    let whole = periods.trunc();
    let frac = periods - whole;

    let exponent = whole
        .to_u64()
        .ok_or_else(|| MortgageError::overflow("discount factor exponent"))?;
    let mut factor = pow_u64(v, exponent)?;

    if !frac.is_zero() {
        let partial = v
            .checked_powd(frac)
            .ok_or_else(|| MortgageError::overflow("discount factor fractional period"))?;
        factor = factor
            .checked_mul(partial)
            .ok_or_else(|| MortgageError::overflow("discount factor"))?;
    }

    Ok(factor)
}

/// Level payment that retires `principal` over `periods` at `rate` per period.
pub fn annuity_payment(principal: Money, rate: Rate, periods: Decimal) -> MortgageResult<Money> {
    if periods <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return principal
            .checked_div(periods)
            .ok_or_else(|| MortgageError::overflow("straight-line payment"));
    }

    let denom = Decimal::ONE - discount_factor(rate, periods)?;
    if denom.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "annuity factor".into(),
        });
    }

    let numerator = principal
        .checked_mul(rate)
        .ok_or_else(|| MortgageError::overflow("annuity payment numerator"))?;
    numerator
        .checked_div(denom)
        .ok_or_else(|| MortgageError::overflow("annuity payment"))
}

/// Present value of a level payment stream. Inverse of [`annuity_payment`].
pub fn annuity_present_value(payment: Money, rate: Rate, periods: Decimal) -> MortgageResult<Money> {
    if rate.is_zero() {
        return payment
            .checked_mul(periods)
            .ok_or_else(|| MortgageError::overflow("annuity present value"));
    }
    let factor = (Decimal::ONE - discount_factor(rate, periods)?)
        .checked_div(rate)
        .ok_or_else(|| MortgageError::overflow("annuity factor"))?;
    payment
        .checked_mul(factor)
        .ok_or_else(|| MortgageError::overflow("annuity present value"))
}

/// base^n by binary exponentiation; `base` is expected in (0, 1].
fn pow_u64(base: Decimal, mut n: u64) -> MortgageResult<Decimal> {
    let mut result = Decimal::ONE;
    let mut b = base;
    while n > 0 {
        if n & 1 == 1 {
            result = result
                .checked_mul(b)
                .ok_or_else(|| MortgageError::overflow("integer power"))?;
        }
        n >>= 1;
        if n > 0 {
            b = b
                .checked_mul(b)
                .ok_or_else(|| MortgageError::overflow("integer power"))?;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate_from_percent() {
        assert_eq!(monthly_rate(dec!(6)), dec!(0.005));
        assert_eq!(monthly_rate(dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_payment_count() {
        assert_eq!(payment_count(dec!(30)).unwrap(), dec!(360));
        assert_eq!(payment_count(dec!(2.5)).unwrap(), dec!(30));
    }

    #[test]
    fn test_payment_count_overflow() {
        let result = payment_count(Decimal::MAX / dec!(2));
        assert!(matches!(result, Err(MortgageError::Overflow { .. })));
    }

    #[test]
    fn test_straight_line_payment_overflow() {
        let result = annuity_payment(dec!(100_000_000_000), Decimal::ZERO, dec!(0.0000000000000000001));
        assert!(matches!(result, Err(MortgageError::Overflow { .. })));
    }

    #[test]
    fn test_present_value_overflow() {
        let result = annuity_present_value(Decimal::MAX, Decimal::ZERO, dec!(12));
        assert!(matches!(result, Err(MortgageError::Overflow { .. })));
    }

    #[test]
    fn test_discount_factor_one_period() {
        let v = discount_factor(dec!(0.25), dec!(1)).unwrap();
        assert_eq!(v, dec!(0.8));
    }

    #[test]
    fn test_discount_factor_matches_repeated_division() {
        let v = discount_factor(dec!(0.01), dec!(12)).unwrap();
        let mut expected = Decimal::ONE;
        for _ in 0..12 {
            expected /= dec!(1.01);
        }
        assert!((v - expected).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_discount_factor_fractional_period() {
        // 1.21^-0.5 = 1 / 1.1
        let v = discount_factor(dec!(0.21), dec!(0.5)).unwrap();
        assert!((v - Decimal::ONE / dec!(1.1)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_discount_factor_extreme_rate_does_not_overflow() {
        // 500% a month over 50 years underflows to zero rather than panicking
        let v = discount_factor(dec!(5), dec!(600)).unwrap();
        assert!(v >= Decimal::ZERO);
        assert!(v < dec!(0.0000001));
    }

    #[test]
    fn test_annuity_payment_zero_rate() {
        let p = annuity_payment(dec!(1200), Decimal::ZERO, dec!(12)).unwrap();
        assert_eq!(p, dec!(100));
    }

    #[test]
    fn test_annuity_payment_rejects_zero_periods() {
        let result = annuity_payment(dec!(1000), dec!(0.01), Decimal::ZERO);
        assert!(matches!(result, Err(MortgageError::InvalidInput { .. })));
    }

    #[test]
    fn test_present_value_inverts_payment() {
        let rate = dec!(0.005);
        let pmt = annuity_payment(dec!(250_000), rate, dec!(360)).unwrap();
        let pv = annuity_present_value(pmt, rate, dec!(360)).unwrap();
        assert!((pv - dec!(250_000)).abs() < dec!(0.000001));
    }
}
