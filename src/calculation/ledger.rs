//! Monthly paid/unpaid ledger distribution.
//!
//! Each approved interval overlapping the ledger window is classified as a
//! whole into paid and unpaid days, then both amounts are apportioned to
//! the calendar months the interval spans, proportional to the days falling
//! in each month.
//!
//! ## Known approximations
//!
//! - Every interval is checked against the same balance snapshot. Remaining
//!   entitlement is not decremented between intervals, so two intervals can
//!   both be judged fully paid against one pool. A
//!   [`WARNING_SHARED_BALANCE_SNAPSHOT`] warning records when this happens.
//! - Each month's share is rounded to a whole day independently, so month
//!   shares may not add back up to the interval's days. A
//!   [`WARNING_LEDGER_ROUNDING_DRIFT`] warning records each drift.
//! - Available balance is the type's own remaining balance plus remaining
//!   annual balance for every paid type, annual included. Annual leave is
//!   therefore checked against twice its remaining balance. A
//!   [`WARNING_ANNUAL_BALANCE_DOUBLE_COUNTED`] warning records each annual
//!   interval that only the second share covered.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::calendar::{month_keys, segment_by_month};
use super::rounding::round_whole_days;
use crate::error::EngineResult;
use crate::models::{
    ApprovedLeaveInterval, AuditStep, AuditWarning, BalanceKey, DateRange, LeaveType, LedgerRow,
    TypeBalance, WARNING_ANNUAL_BALANCE_DOUBLE_COUNTED, WARNING_LEDGER_ROUNDING_DRIFT,
    WARNING_SHARED_BALANCE_SNAPSHOT, YearMonth,
};

/// Why an interval's days were classified the way they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationBasis {
    /// The leave type is unpaid by definition.
    UnpaidType,
    /// The leave type has no balance; its usage is unpaid.
    Unconfigured,
    /// Available balance covers every day.
    Covered,
    /// Available balance covers only part of the interval.
    PartiallyCovered,
}

/// Paid/unpaid split of one clipped interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalClassification {
    /// The interval's leave type.
    pub leave_type: LeaveType,
    /// The interval clipped to the ledger window.
    pub range: DateRange,
    /// Days in the clipped interval.
    pub total_days: Decimal,
    /// Days covered by entitlement.
    pub paid_days: Decimal,
    /// Days not covered.
    pub unpaid_days: Decimal,
    /// Why the split came out this way.
    pub basis: ClassificationBasis,
}

/// The result of distributing leave over ledger months.
#[derive(Debug, Clone)]
pub struct LedgerDistribution {
    /// One row per month of the window, ascending.
    pub rows: Vec<LedgerRow>,
    /// Classification of every interval that overlapped the window.
    pub classifications: Vec<IntervalClassification>,
    /// Audit steps recorded during distribution.
    pub audit_steps: Vec<AuditStep>,
    /// Policy-edge warnings.
    pub warnings: Vec<AuditWarning>,
}

fn remaining_of(balances: &BTreeMap<BalanceKey, TypeBalance>, leave_type: LeaveType) -> Option<Decimal> {
    balances
        .get(&BalanceKey::Leave(leave_type))
        .map(|b| b.remaining)
}

/// Splits `total_days` of a leave type into paid and unpaid days.
///
/// Unpaid leave is always unpaid, and so is leave of a type absent from
/// the balance map. Otherwise the days are compared with the type's own
/// remaining balance plus remaining annual balance, which for annual leave
/// counts remaining annual twice: enough balance pays every day, too little
/// pays `available` days and leaves the rest unpaid.
///
/// Returns `(paid, unpaid, basis)`.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::{classify_days, ClassificationBasis};
/// use leave_engine::models::{BalanceKey, LeaveType, TypeBalance};
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let balances = BTreeMap::from([
///     (BalanceKey::Leave(LeaveType::Annual), TypeBalance::new(Decimal::from(3), Decimal::ZERO)),
///     (BalanceKey::Leave(LeaveType::Sick), TypeBalance::new(Decimal::from(2), Decimal::ZERO)),
/// ]);
///
/// let (paid, unpaid, basis) = classify_days(LeaveType::Sick, Decimal::from(7), &balances);
/// assert_eq!(paid, Decimal::from(5));
/// assert_eq!(unpaid, Decimal::from(2));
/// assert_eq!(basis, ClassificationBasis::PartiallyCovered);
/// ```
pub fn classify_days(
    leave_type: LeaveType,
    total_days: Decimal,
    balances: &BTreeMap<BalanceKey, TypeBalance>,
) -> (Decimal, Decimal, ClassificationBasis) {
    if leave_type.is_unpaid() {
        return (Decimal::ZERO, total_days, ClassificationBasis::UnpaidType);
    }

    let Some(own_remaining) = remaining_of(balances, leave_type) else {
        return (Decimal::ZERO, total_days, ClassificationBasis::Unconfigured);
    };

    let available = own_remaining + remaining_of(balances, LeaveType::Annual).unwrap_or(Decimal::ZERO);

    if total_days <= available {
        (total_days, Decimal::ZERO, ClassificationBasis::Covered)
    } else {
        let paid = available.max(Decimal::ZERO);
        (paid, total_days - paid, ClassificationBasis::PartiallyCovered)
    }
}

/// Distributes approved leave over the months of `window`.
///
/// `window` runs from the first ledger day to the last day of the last
/// ledger month. Every month it touches gets a row, zero-filled when no
/// leave falls in it.
///
/// # Arguments
///
/// * `leaves` - Approved leave intervals; those outside the window are ignored
/// * `window` - The ledger window
/// * `balances` - The balance snapshot every interval is classified against
/// * `step_number_start` - The first step number for audit trail sequencing
///
/// # Errors
///
/// Returns `InvalidLeaveInterval` for an interval that ends before it starts.
pub fn distribute_monthly(
    leaves: &[ApprovedLeaveInterval],
    window: &DateRange,
    balances: &BTreeMap<BalanceKey, TypeBalance>,
    step_number_start: u32,
) -> EngineResult<LedgerDistribution> {
    let mut step_number = step_number_start;
    let mut month_totals: BTreeMap<YearMonth, (Decimal, Decimal)> = month_keys(window.start, window.end)
        .into_iter()
        .map(|m| (m, (Decimal::ZERO, Decimal::ZERO)))
        .collect();
    let mut classifications = Vec::new();
    let mut audit_steps = Vec::new();
    let mut warnings = Vec::new();

    for leave in leaves {
        let Some(clipped) = leave.range()?.clip(window) else {
            continue;
        };
        let total_days = Decimal::from(clipped.days());
        let (paid_days, unpaid_days, basis) = classify_days(leave.leave_type, total_days, balances);

        if leave.leave_type.is_annual() {
            let own_remaining = remaining_of(balances, LeaveType::Annual).unwrap_or(Decimal::ZERO);
            if paid_days > own_remaining.max(Decimal::ZERO) {
                debug!(
                    start = %clipped.start,
                    end = %clipped.end,
                    paid_days = %paid_days,
                    annual_remaining = %own_remaining,
                    "Annual leave paid beyond remaining annual balance"
                );
                warnings.push(AuditWarning::new(
                    WARNING_ANNUAL_BALANCE_DOUBLE_COUNTED,
                    format!(
                        "annual leave {} to {}: {} day(s) paid against {} remaining annual counted twice",
                        clipped.start, clipped.end, paid_days.normalize(), own_remaining
                    ),
                    "medium",
                ));
            }
        }

        let mut allocated = Decimal::ZERO;
        let mut month_shares = serde_json::Map::new();
        for segment in segment_by_month(&clipped) {
            let segment_days = Decimal::from(segment.days());
            let paid_share = round_whole_days(paid_days * segment_days / total_days);
            let unpaid_share = round_whole_days(unpaid_days * segment_days / total_days);
            allocated += paid_share + unpaid_share;

            if let Some((paid, unpaid)) = month_totals.get_mut(&segment.year_month) {
                *paid += paid_share;
                *unpaid += unpaid_share;
            }
            month_shares.insert(
                segment.year_month.to_string(),
                serde_json::json!({
                    "days": segment.days(),
                    "paid": paid_share.to_string(),
                    "unpaid": unpaid_share.to_string(),
                }),
            );
        }

        if allocated != total_days {
            debug!(
                leave_type = %leave.leave_type,
                start = %clipped.start,
                end = %clipped.end,
                total_days = %total_days,
                allocated = %allocated,
                "Per-month rounding drift"
            );
            warnings.push(AuditWarning::new(
                WARNING_LEDGER_ROUNDING_DRIFT,
                format!(
                    "{} leave {} to {}: month shares add up to {} of {} day(s)",
                    leave.leave_type, clipped.start, clipped.end, allocated, total_days
                ),
                "low",
            ));
        }

        audit_steps.push(AuditStep {
            step_number,
            rule_id: "ledger_distribution".to_string(),
            rule_name: "Monthly Ledger Distribution".to_string(),
            input: serde_json::json!({
                "leave_type": leave.leave_type,
                "start_date": clipped.start.to_string(),
                "end_date": clipped.end.to_string(),
                "total_days": total_days.to_string(),
            }),
            output: serde_json::json!({
                "basis": basis,
                "paid_days": paid_days.to_string(),
                "unpaid_days": unpaid_days.to_string(),
                "months": month_shares,
            }),
            reasoning: format!(
                "{} day(s) of {} leave: {} paid, {} unpaid ({:?})",
                total_days,
                leave.leave_type,
                paid_days.normalize(),
                unpaid_days.normalize(),
                basis
            ),
        });
        step_number += 1;

        classifications.push(IntervalClassification {
            leave_type: leave.leave_type,
            range: clipped,
            total_days,
            paid_days,
            unpaid_days,
            basis,
        });
    }

    let balance_checked = classifications
        .iter()
        .filter(|c| matches!(c.basis, ClassificationBasis::Covered | ClassificationBasis::PartiallyCovered))
        .count();
    if balance_checked > 1 {
        warnings.push(AuditWarning::new(
            WARNING_SHARED_BALANCE_SNAPSHOT,
            format!(
                "{} intervals were classified against the same balance snapshot without decrementing it",
                balance_checked
            ),
            "medium",
        ));
    }

    let rows = month_totals
        .into_iter()
        .map(|(year_month, (paid, unpaid))| LedgerRow {
            year_month,
            paid_days: paid.to_u32().unwrap_or(0),
            unpaid_days: unpaid.to_u32().unwrap_or(0),
        })
        .collect();

    Ok(LedgerDistribution {
        rows,
        classifications,
        audit_steps,
        warnings,
    })
}
