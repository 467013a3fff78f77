use chrono::NaiveDate;
use clap::Args;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use mortgage_calc_core::amortization::display::DisplaySummary;
use mortgage_calc_core::amortization::permissive::{self, PermissiveInputs};
use mortgage_calc_core::amortization::table::{self, AmortizationTableInput};
use mortgage_calc_core::amortization::{self, LoanInputs};

use crate::input;

/// Loan parameters shared by every loan command
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate in percent (4.5 = 4.5%)
    #[arg(long, alias = "annual-rate-percent", allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term-years", allow_hyphen_values = true)]
    pub years: Option<Decimal>,
}

impl LoanArgs {
    fn loan_from_flags(&self) -> Result<LoanInputs, Box<dyn std::error::Error>> {
        Ok(LoanInputs::new(
            self.principal
                .ok_or("--principal is required (or provide --input)")?,
            self.rate.ok_or("--rate is required (or provide --input)")?,
            self.years.ok_or("--years is required (or provide --input)")?,
        ))
    }

    fn has_flags(&self) -> bool {
        self.principal.is_some() || self.rate.is_some() || self.years.is_some()
    }
}

/// Arguments for the payment summary
#[derive(Args)]
pub struct PaymentArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Clamp inputs to the calculator's slider ranges before calculating
    #[arg(long, conflicts_with = "permissive")]
    pub clamp: bool,

    /// Skip validation and use floating point, reproducing NaN/inf results
    #[arg(long)]
    pub permissive: bool,

    /// YAML or JSON file overriding the slider ranges
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for the amortization table
#[derive(Args)]
pub struct AmortizeArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Origination date (YYYY-MM-DD); payments fall due monthly after it
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for the input range report
#[derive(Args)]
pub struct BoundsArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// YAML or JSON file overriding the slider ranges
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.permissive {
        return run_permissive(&args.loan);
    }

    let mut loan: LoanInputs =
        input::resolve(args.loan.input.as_deref(), || args.loan.loan_from_flags())?;

    let bounds = input::config::bounds_or_default(args.config.as_deref())?;
    let mut notes: Vec<String> = Vec::new();
    if args.clamp {
        let clamped = bounds.clamp(&loan);
        if clamped != loan {
            notes.push("Inputs were clamped to the calculator ranges".into());
            tracing::info!(?loan, ?clamped, "clamped loan inputs");
        }
        loan = clamped;
    } else {
        for v in bounds.check(&loan) {
            notes.push(format!(
                "{} = {} is outside the calculator range [{}, {}]",
                v.field, v.value, v.min, v.max
            ));
        }
    }

    let mut output = amortization::analyze_loan(&loan)?;
    output.warnings.extend(notes);
    let display = DisplaySummary::from_schedule(&output.result.schedule);

    let mut value = serde_json::to_value(output)?;
    if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
        result.insert("display".into(), serde_json::to_value(display)?);
    }
    Ok(value)
}

fn run_permissive(args: &LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loose: PermissiveInputs = input::resolve(args.input.as_deref(), || {
        let loan = args.loan_from_flags()?;
        Ok(PermissiveInputs {
            principal: to_f64(loan.principal)?,
            annual_rate_percent: to_f64(loan.annual_rate_percent)?,
            term_years: to_f64(loan.term_years)?,
        })
    })?;

    let schedule = permissive::compute_schedule_permissive(&loose);
    let warnings: Vec<String> = schedule.anomalies().iter().map(|a| a.to_string()).collect();

    // serde_json writes NaN and inf as null
    Ok(json!({
        "result": schedule,
        "methodology": "Unvalidated floating-point annuity payment",
        "assumptions": loose,
        "finite": schedule.is_finite(),
        "warnings": warnings,
    }))
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table_input: AmortizationTableInput =
        input::resolve(args.loan.input.as_deref(), || {
            Ok(AmortizationTableInput {
                loan: args.loan.loan_from_flags()?,
                start_date: args.start_date,
            })
        })?;
    let result = table::build_amortization_table(&table_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_bounds(args: BoundsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bounds = input::config::bounds_or_default(args.config.as_deref())?;

    if args.loan.input.is_none() && !args.loan.has_flags() {
        return Ok(json!({ "result": bounds }));
    }

    let loan: LoanInputs = match args.loan.input.as_deref() {
        Some(path) => input::file::read_json(path)?,
        None => args.loan.loan_from_flags()?,
    };
    let violations = bounds.check(&loan);
    let clamped = bounds.clamp(&loan);

    Ok(json!({
        "result": {
            "within_bounds": violations.is_empty(),
            "violations": violations,
            "clamped": clamped,
        },
        "bounds": bounds,
    }))
}

fn to_f64(value: Decimal) -> Result<f64, Box<dyn std::error::Error>> {
    value
        .to_f64()
        .ok_or_else(|| format!("{value} cannot be represented as a float").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn loan_file(tag: &str, json: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("mortgage-{}-{}.json", tag, std::process::id()));
        fs::write(&path, json).unwrap();
        path
    }

    fn payment_args(path: &Path, clamp: bool) -> PaymentArgs {
        PaymentArgs {
            loan: LoanArgs {
                input: Some(path.to_str().unwrap().to_string()),
                principal: None,
                rate: None,
                years: None,
            },
            clamp,
            permissive: false,
            config: None,
        }
    }

    fn decimal_at(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    fn warnings(value: &Value) -> Vec<String> {
        value["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_out_of_range_loan_is_computed_with_warning() {
        let path = loan_file(
            "over",
            r#"{"principal": 6000000, "annual_rate_percent": 4.5, "term_years": 30}"#,
        );
        let value = run_payment(payment_args(&path, false));
        let _ = fs::remove_file(&path);
        let value = value.unwrap();

        let w = warnings(&value);
        assert!(
            w.iter()
                .any(|s| s.starts_with("principal = 6000000 is outside the calculator range")),
            "warnings: {w:?}"
        );
        assert_eq!(value["assumptions"]["principal"], "6000000");
        assert!(value["result"]["schedule"]["monthly_payment"].is_string());
        assert_eq!(value["result"]["display"]["monthly_payment"], "$30,401");
    }

    #[test]
    fn test_clamp_rescues_zero_term() {
        let path = loan_file(
            "clamp",
            r#"{"principal": 120000, "annual_rate_percent": 0, "term_years": 0}"#,
        );
        let value = run_payment(payment_args(&path, true));
        let _ = fs::remove_file(&path);
        let value = value.unwrap();

        let w = warnings(&value);
        assert!(w.contains(&"Inputs were clamped to the calculator ranges".to_string()));
        assert!(!w.iter().any(|s| s.contains("outside the calculator range")));
        assert_eq!(decimal_at(&value["assumptions"]["term_years"]), dec!(1));
        assert_eq!(
            decimal_at(&value["result"]["schedule"]["monthly_payment"]),
            dec!(10000)
        );
    }

    #[test]
    fn test_zero_term_without_clamp_is_rejected() {
        let path = loan_file(
            "zero",
            r#"{"principal": 120000, "annual_rate_percent": 5, "term_years": 0}"#,
        );
        let result = run_payment(payment_args(&path, false));
        let _ = fs::remove_file(&path);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("term_years"));
    }

    #[test]
    fn test_input_file_wins_over_flags() {
        let path = loan_file(
            "wins",
            r#"{"principal": 100000, "annual_rate_percent": 0, "term_years": 10}"#,
        );
        let mut args = payment_args(&path, false);
        args.loan.principal = Some(dec!(1));
        args.loan.rate = Some(dec!(9));
        args.loan.years = Some(dec!(1));
        let value = run_payment(args);
        let _ = fs::remove_file(&path);
        let value = value.unwrap();

        assert_eq!(value["assumptions"]["principal"], "100000");
        assert_eq!(value["assumptions"]["term_years"], "10");
    }

    #[test]
    fn test_flags_require_all_three_values() {
        let args = LoanArgs {
            input: None,
            principal: Some(dec!(1000)),
            rate: None,
            years: Some(dec!(5)),
        };
        let err = args.loan_from_flags().unwrap_err();
        assert!(err.to_string().contains("--rate"));
    }
}
