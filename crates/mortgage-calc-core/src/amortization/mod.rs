pub mod bounds;
pub mod display;
pub mod engine;
pub mod permissive;

#[cfg(feature = "table")]
pub mod table;

pub use engine::{
    analyze_loan, compute_monthly_payment, compute_schedule, diagnose, payment_breakdown,
    LoanAnalysis, LoanInputs, LoanSchedule, NumericAnomaly, PaymentBreakdown,
};
