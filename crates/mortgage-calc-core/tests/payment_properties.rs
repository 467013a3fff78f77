use mortgage_calc_core::amortization::permissive::{compute_schedule_permissive, PermissiveInputs};
use mortgage_calc_core::amortization::{compute_monthly_payment, compute_schedule, LoanInputs};
use mortgage_calc_core::time_value::{annuity_present_value, discount_factor, monthly_rate};
use mortgage_calc_core::MortgageError;
use proptest::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Whole dollars up to one billion.
fn principal() -> impl Strategy<Value = Decimal> {
    (0u64..=1_000_000_000).prop_map(Decimal::from)
}

/// Annual rate in hundredths of a percent, 0.01% to 20%.
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..=2000).prop_map(|bp| Decimal::new(bp, 2))
}

fn whole_years() -> impl Strategy<Value = Decimal> {
    (1u32..=50).prop_map(Decimal::from)
}

/// Whole number of months, expressed in years (13 months = 1.0833.. years).
fn month_aligned_years() -> impl Strategy<Value = Decimal> {
    (12u32..=600).prop_map(|m| Decimal::from(m) / dec!(12))
}

/// Hundredths of a year, mostly landing between payment dates.
fn fractional_years() -> impl Strategy<Value = Decimal> {
    (100i64..=5000).prop_map(|c| Decimal::new(c, 2))
}

fn term() -> impl Strategy<Value = Decimal> {
    prop_oneof![whole_years(), month_aligned_years(), fractional_years()]
}

proptest! {
    #[test]
    fn zero_rate_is_principal_over_payments(p in principal(), y in term()) {
        let pmt = compute_monthly_payment(p, Decimal::ZERO, y).unwrap();
        prop_assert_eq!(pmt, p / (y * dec!(12)));
    }

    #[test]
    fn payment_satisfies_annuity_equation(p in principal(), rate in positive_rate(), y in term()) {
        let pmt = compute_monthly_payment(p, rate, y).unwrap();
        let r = monthly_rate(rate);
        let n = y * dec!(12);
        let lhs = pmt * (Decimal::ONE - discount_factor(r, n).unwrap());
        let rhs = p * r;
        let tol = rhs.abs() * dec!(0.000000001) + dec!(0.0000000000001);
        prop_assert!((lhs - rhs).abs() <= tol, "lhs {} rhs {}", lhs, rhs);
    }

    #[test]
    fn payment_discounts_back_to_principal(p in principal(), rate in positive_rate(), y in term()) {
        let pmt = compute_monthly_payment(p, rate, y).unwrap();
        let pv = annuity_present_value(pmt, monthly_rate(rate), y * dec!(12)).unwrap();
        prop_assert!((pv - p).abs() <= p * dec!(0.000000001) + dec!(0.0000001));
    }

    #[test]
    fn totals_are_definitional(p in principal(), rate in positive_rate(), y in term()) {
        let s = compute_schedule(&LoanInputs::new(p, rate, y)).unwrap();
        prop_assert_eq!(s.total_paid, s.monthly_payment * (y * dec!(12)));
        prop_assert_eq!(s.total_interest, s.total_paid - p);
        prop_assert_eq!(s.monthly_interest, s.monthly_payment - s.monthly_principal);
    }

    #[test]
    fn payment_rises_with_rate(
        p in principal(),
        y in term(),
        a in 0i64..=2000,
        b in 0i64..=2000,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low = compute_monthly_payment(p, Decimal::new(lo, 2), y).unwrap();
        let high = compute_monthly_payment(p, Decimal::new(hi, 2), y).unwrap();
        prop_assert!(low <= high, "{} > {}", low, high);
    }

    #[test]
    fn payment_falls_with_term(
        p in principal(),
        bp in 0i64..=2000,
        a in term(),
        b in term(),
    ) {
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        let rate = Decimal::new(bp, 2);
        let short_pmt = compute_monthly_payment(p, rate, short).unwrap();
        let long_pmt = compute_monthly_payment(p, rate, long).unwrap();
        prop_assert!(long_pmt <= short_pmt, "{} > {}", long_pmt, short_pmt);
    }

    #[test]
    fn annuity_equation_holds_between_payment_dates(c in 100i64..=5000) {
        prop_assume!(c % 100 != 0);
        let y = Decimal::new(c, 2);
        let p = dec!(250_000);
        let pmt = compute_monthly_payment(p, dec!(6), y).unwrap();
        let r = monthly_rate(dec!(6));
        let lhs = pmt * (Decimal::ONE - discount_factor(r, y * dec!(12)).unwrap());
        prop_assert!((lhs - p * r).abs() <= p * r * dec!(0.000000001));
    }

    #[test]
    fn invalid_inputs_are_rejected(
        p in principal(),
        rate in positive_rate(),
        bad in 1i64..=1_000_000,
    ) {
        let negative = -Decimal::from(bad);
        let cases = [
            LoanInputs::new(p, rate, Decimal::ZERO),
            LoanInputs::new(p, rate, negative),
            LoanInputs::new(negative, rate, dec!(30)),
            LoanInputs::new(p, negative, dec!(30)),
        ];
        for inputs in cases {
            let rejected = matches!(
                compute_schedule(&inputs),
                Err(MortgageError::InvalidInput { .. })
            );
            prop_assert!(rejected);
        }
    }

    #[test]
    fn strict_and_permissive_agree_on_valid_inputs(
        p in 1u64..=10_000_000,
        bp in 0i64..=2000,
        y in 1u32..=50,
    ) {
        let rate = Decimal::new(bp, 2);
        let strict = compute_monthly_payment(Decimal::from(p), rate, Decimal::from(y))
            .unwrap()
            .to_f64()
            .unwrap();
        let loose = compute_schedule_permissive(&PermissiveInputs {
            principal: p as f64,
            annual_rate_percent: rate.to_f64().unwrap(),
            term_years: y as f64,
        });
        prop_assert!((strict - loose.monthly_payment).abs() <= strict * 1e-9);
    }
}
