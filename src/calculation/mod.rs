//! Calculation logic for the Leave Engine.
//!
//! The pipeline runs accrual, then consumption aggregation, then cascading
//! reconciliation to produce a balance sheet. The monthly ledger distributes
//! approved leave over calendar months against that balance sheet.
//!
//! Every function here is pure: inputs are materialized up front and the
//! as-of date is always passed in.

mod accrual;
mod calendar;
mod consumption;
mod ledger;
mod reconciliation;
mod rounding;

pub use accrual::{AccrualResult, accrual_start, accrued_total, calculate_accrual, months_eligible};
pub use calendar::{
    MonthSegment, calendar_year, first_of_month, month_end, month_keys, months_inclusive,
    segment_by_month, year_end, year_start,
};
pub use consumption::{ConsumptionResult, aggregate_consumption};
pub use ledger::{
    ClassificationBasis, IntervalClassification, LedgerDistribution, classify_days,
    distribute_monthly,
};
pub use reconciliation::{ReconciliationResult, TypeSettlement, reconcile_balances};
pub use rounding::{round_2dp, round_whole_days};
