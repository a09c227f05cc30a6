//! Leave consumption aggregation.
//!
//! Sums approved leave days per leave type inside a bounded window
//! (normally one calendar year). The aggregator knows nothing about
//! entitlement; reconciliation policy lives in [`super::reconciliation`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{ApprovedLeaveInterval, AuditStep, DateRange, LeaveType};

/// The result of aggregating consumption.
#[derive(Debug, Clone)]
pub struct ConsumptionResult {
    /// Days consumed per leave type. Types with no leave are absent.
    pub used_by_type: BTreeMap<LeaveType, Decimal>,
    /// Intervals that contributed at least one day.
    pub counted_intervals: usize,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

/// Aggregates consumed days per leave type within `window`.
///
/// Each interval is clipped to the window; intervals entirely outside it
/// contribute nothing and an interval spanning a window boundary contributes
/// only its in-window days.
///
/// # Errors
///
/// Returns `InvalidLeaveInterval` for any interval that ends before it
/// starts, even one lying outside the window.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::aggregate_consumption;
/// use leave_engine::models::{ApprovedLeaveInterval, DateRange, LeaveType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let year = DateRange::new(
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
/// )
/// .unwrap();
/// let leaves = vec![ApprovedLeaveInterval {
///     leave_type: LeaveType::Annual,
///     start_date: NaiveDate::from_ymd_opt(2025, 12, 30).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
/// }];
///
/// let result = aggregate_consumption(&leaves, &year, 1).unwrap();
/// assert_eq!(result.used_by_type[&LeaveType::Annual], Decimal::from(2));
/// ```
pub fn aggregate_consumption(
    leaves: &[ApprovedLeaveInterval],
    window: &DateRange,
    step_number: u32,
) -> EngineResult<ConsumptionResult> {
    let mut used_by_type: BTreeMap<LeaveType, Decimal> = BTreeMap::new();
    let mut counted_intervals = 0;

    for leave in leaves {
        let range = leave.range()?;
        let Some(clipped) = range.clip(window) else {
            continue;
        };
        *used_by_type.entry(leave.leave_type).or_default() += Decimal::from(clipped.days());
        counted_intervals += 1;
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "consumption_aggregation".to_string(),
        rule_name: "Consumption Aggregation".to_string(),
        input: serde_json::json!({
            "window_start": window.start.to_string(),
            "window_end": window.end.to_string(),
            "intervals": leaves.len(),
        }),
        output: serde_json::json!({
            "counted_intervals": counted_intervals,
            "used": used_by_type
                .iter()
                .map(|(t, v)| (t.to_string(), serde_json::json!(v.to_string())))
                .collect::<serde_json::Map<_, _>>(),
        }),
        reasoning: format!(
            "{} of {} approved interval(s) fall within {} to {}",
            counted_intervals,
            leaves.len(),
            window.start,
            window.end
        ),
    };

    Ok(ConsumptionResult {
        used_by_type,
        counted_intervals,
        audit_step,
    })
}
