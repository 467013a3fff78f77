use napi::Result as NapiResult;
use napi_derive::napi;

use mortgage_calc_core::amortization::bounds::InputBounds;
use mortgage_calc_core::amortization::display::DisplaySummary;
use mortgage_calc_core::amortization::permissive::{self, PermissiveInputs};
use mortgage_calc_core::amortization::table::{self, AmortizationTableInput};
use mortgage_calc_core::amortization::{self, LoanInputs};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Payment summary
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::analyze_loan(&input).map_err(to_napi_error)?;
    let display = DisplaySummary::from_schedule(&output.result.schedule);

    let mut value = serde_json::to_value(output).map_err(to_napi_error)?;
    if let Some(result) = value.get_mut("result").and_then(|v| v.as_object_mut()) {
        let display = serde_json::to_value(display).map_err(to_napi_error)?;
        result.insert("display".into(), display);
    }
    serde_json::to_string(&value).map_err(to_napi_error)
}

/// Legacy floating-point behaviour, NaN and inf come back as null.
#[napi]
pub fn loan_schedule_permissive(input_json: String) -> NapiResult<String> {
    let input: PermissiveInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule = permissive::compute_schedule_permissive(&input);
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization table
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_table(input_json: String) -> NapiResult<String> {
    let input: AmortizationTableInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = table::build_amortization_table(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculator ranges
// ---------------------------------------------------------------------------

#[napi]
pub fn input_bounds() -> NapiResult<String> {
    serde_json::to_string(&InputBounds::default()).map_err(to_napi_error)
}
