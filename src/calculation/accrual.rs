//! Monthly accrual calculation.
//!
//! Entitlement is earned per calendar month from the later of the
//! employee's joining month and January of the as-of year, up to and
//! including the as-of month.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calendar::{first_of_month, months_inclusive, year_start};
use super::rounding::round_2dp;
use crate::models::{AccrualRule, AuditStep, LeaveType};

/// The result of accruing entitlement for every active rule.
#[derive(Debug, Clone)]
pub struct AccrualResult {
    /// The first day accrual counts from.
    pub accrual_start: NaiveDate,
    /// Calendar months credited.
    pub months_eligible: u32,
    /// Entitlement per configured leave type.
    pub totals: BTreeMap<LeaveType, Decimal>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the first day accrual counts from for the year of `as_of`.
pub fn accrual_start(joining_date: NaiveDate, as_of: NaiveDate) -> NaiveDate {
    first_of_month(joining_date).max(year_start(as_of))
}

/// Counts the months of accrual an employee has earned in the as-of year.
///
/// The joining month counts in full regardless of the joining day. An
/// employee who joins after `as_of` has earned nothing.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::months_eligible;
/// use chrono::NaiveDate;
///
/// let joined = NaiveDate::from_ymd_opt(2020, 5, 12).unwrap();
/// let as_of = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
/// assert_eq!(months_eligible(joined, as_of), 7);
///
/// let joined_mid_year = NaiveDate::from_ymd_opt(2026, 3, 25).unwrap();
/// assert_eq!(months_eligible(joined_mid_year, as_of), 5);
/// ```
pub fn months_eligible(joining_date: NaiveDate, as_of: NaiveDate) -> u32 {
    let start = accrual_start(joining_date, as_of);
    if start > as_of {
        0
    } else {
        months_inclusive(start, as_of)
    }
}

/// Entitlement a single rule yields after `months` months.
///
/// `round(months × monthly_credit, 2)`, capped at the rule's annual limit.
pub fn accrued_total(rule: &AccrualRule, months: u32) -> Decimal {
    let total = round_2dp(Decimal::from(months) * rule.monthly_credit);
    match rule.max_annual_limit {
        Some(limit) => total.min(limit),
        None => total,
    }
}

/// Accrues entitlement for every active rule.
///
/// Inactive rules are skipped. If two active rules share a leave type the
/// first one wins; rule sets are validated for duplicates when loaded.
///
/// # Arguments
///
/// * `rules` - The tenant's accrual rules
/// * `joining_date` - The employee's joining date
/// * `as_of` - The date entitlement is computed as of
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_accrual(
    rules: &[AccrualRule],
    joining_date: NaiveDate,
    as_of: NaiveDate,
    step_number: u32,
) -> AccrualResult {
    let start = accrual_start(joining_date, as_of);
    let months = months_eligible(joining_date, as_of);

    let mut totals = BTreeMap::new();
    for rule in rules.iter().filter(|r| r.is_active) {
        totals
            .entry(rule.leave_type)
            .or_insert_with(|| accrued_total(rule, months));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "monthly_accrual".to_string(),
        rule_name: "Monthly Accrual".to_string(),
        input: serde_json::json!({
            "joining_date": joining_date.to_string(),
            "as_of": as_of.to_string(),
            "rules": rules
                .iter()
                .filter(|r| r.is_active)
                .map(|r| serde_json::json!({
                    "leave_type": r.leave_type,
                    "monthly_credit": r.monthly_credit.to_string(),
                    "max_annual_limit": r.max_annual_limit.map(|l| l.to_string()),
                }))
                .collect::<Vec<_>>(),
        }),
        output: serde_json::json!({
            "accrual_start": start.to_string(),
            "months_eligible": months,
            "totals": totals
                .iter()
                .map(|(t, v)| (t.to_string(), serde_json::json!(v.to_string())))
                .collect::<serde_json::Map<_, _>>(),
        }),
        reasoning: if months == 0 {
            format!(
                "Accrual starts {} which is after {}; no months eligible",
                start, as_of
            )
        } else {
            format!(
                "{} month(s) eligible from {} through {}",
                months, start, as_of
            )
        },
    };

    AccrualResult {
        accrual_start: start,
        months_eligible: months,
        totals,
        audit_step,
    }
}
