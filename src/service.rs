//! Query operations over a [`LeaveDataSource`].
//!
//! These are the two reads exposed to callers: an employee's balance sheet
//! and their monthly paid/unpaid ledger. Both are computed fresh from the
//! data source on every call.

use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::calculation::{
    aggregate_consumption, calculate_accrual, calendar_year, distribute_monthly, first_of_month,
    month_end, reconcile_balances, year_start,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, DateRange, LeaveBalanceSheet, LedgerRow, LedgerTotals,
    MonthlyLedger,
};
use crate::store::LeaveDataSource;

/// The resolved window of a monthly ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerWindow {
    /// First day covered.
    pub from: NaiveDate,
    /// First day of the last month covered.
    pub to: NaiveDate,
}

impl LedgerWindow {
    /// The days intervals are clipped to, or `None` when the window is
    /// empty.
    ///
    /// The range ends on the last day of the `to` month.
    pub fn clip_range(&self) -> Option<DateRange> {
        if self.is_empty() {
            return None;
        }
        DateRange::new(self.from, month_end(self.to)).ok()
    }

    /// Returns true if no month falls in the window.
    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }
}

/// Resolves the ledger window from optional bounds.
///
/// `from` defaults to January 1 of the as-of year. `to` defaults to, and is
/// always capped at, the first day of the as-of month, so the ledger never
/// runs past the current month.
///
/// # Errors
///
/// Returns `InvalidDateRange` when both bounds are given and `from` is after
/// `to`. A window that only becomes empty through the cap is not an error;
/// it yields a ledger with no rows.
///
/// # Example
///
/// ```
/// use leave_engine::service::resolve_ledger_window;
/// use chrono::NaiveDate;
///
/// let as_of = NaiveDate::from_ymd_opt(2026, 7, 15).unwrap();
/// let window = resolve_ledger_window(None, None, as_of).unwrap();
/// assert_eq!(window.from, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
/// assert_eq!(window.to, NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
/// ```
pub fn resolve_ledger_window(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    as_of: NaiveDate,
) -> EngineResult<LedgerWindow> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(EngineError::InvalidDateRange { from, to });
        }
    }

    let cap = first_of_month(as_of);
    let from = from.unwrap_or_else(|| year_start(as_of));
    let to = to.unwrap_or(cap).min(cap);

    Ok(LedgerWindow { from, to })
}

/// Computes an employee's leave balances as of a date.
///
/// Runs accrual, consumption and reconciliation for the calendar year of
/// `as_of`.
///
/// # Errors
///
/// - `EmployeeNotFound` / `JoiningDateMissing` for an unknown employee or
///   one without a joining date
/// - `AccrualConfigMissing` when the employee's tenant has no rule set
/// - `InvalidLeaveInterval` when approved leave ends before it starts
pub fn get_leave_balance(
    source: &dyn LeaveDataSource,
    employee_id: &str,
    as_of: NaiveDate,
) -> EngineResult<LeaveBalanceSheet> {
    let start_time = Instant::now();

    let employee = source.employee(employee_id)?;
    let joining_date = employee.require_joining_date()?;
    let rules = source.active_accrual_rules(&employee.tenant_id)?;
    let year = calendar_year(as_of);
    let leaves = source.approved_leaves(employee_id, Some(&year))?;

    let accrual = calculate_accrual(&rules, joining_date, as_of, 1);
    let consumption = aggregate_consumption(&leaves, &year, 2)?;
    let reconciliation = reconcile_balances(&accrual.totals, &consumption.used_by_type, 3);

    debug!(
        employee_id = %employee_id,
        months_eligible = accrual.months_eligible,
        lwp = %reconciliation.lwp(),
        "Balances reconciled"
    );

    let mut steps = vec![accrual.audit_step, consumption.audit_step];
    steps.extend(reconciliation.audit_steps);

    Ok(LeaveBalanceSheet {
        employee_id: employee.id,
        as_of,
        year: as_of.year(),
        months_eligible: accrual.months_eligible,
        balances: reconciliation.balances,
        audit_trace: AuditTrace {
            steps,
            warnings: reconciliation.warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        },
    })
}

/// Builds an employee's monthly paid/unpaid ledger.
///
/// Leave in the window is classified against the balance sheet as of
/// `as_of`. See [`resolve_ledger_window`] for how `from` and `to` are
/// defaulted and capped.
///
/// # Errors
///
/// `InvalidDateRange` for a reversed explicit window, plus every error of
/// [`get_leave_balance`].
pub fn get_monthly_ledger(
    source: &dyn LeaveDataSource,
    employee_id: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    as_of: NaiveDate,
) -> EngineResult<MonthlyLedger> {
    let start_time = Instant::now();
    let window = resolve_ledger_window(from, to, as_of)?;
    let sheet = get_leave_balance(source, employee_id, as_of)?;

    let mut steps: Vec<AuditStep> = sheet.audit_trace.steps;
    let mut warnings: Vec<AuditWarning> = sheet.audit_trace.warnings;

    let rows: Vec<LedgerRow> = match window.clip_range() {
        Some(range) => {
            let leaves = source.approved_leaves(employee_id, Some(&range))?;
            let next_step = steps.len() as u32 + 1;
            let distribution = distribute_monthly(&leaves, &range, &sheet.balances, next_step)?;
            steps.extend(distribution.audit_steps);
            warnings.extend(distribution.warnings);
            distribution.rows
        }
        None => {
            debug!(
                employee_id = %employee_id,
                from = %window.from,
                to = %window.to,
                "Ledger window empty after capping"
            );
            Vec::new()
        }
    };

    Ok(MonthlyLedger {
        employee_id: sheet.employee_id,
        from: window.from,
        to: window.to,
        totals: LedgerTotals::from_rows(&rows),
        rows,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TenantConfig;
    use crate::models::{
        AccrualRule, BalanceKey, Employee, LeaveType, WARNING_SHARED_BALANCE_SNAPSHOT, YearMonth,
    };
    use crate::store::InMemoryStore;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(leave_type: LeaveType, credit: &str) -> AccrualRule {
        AccrualRule {
            tenant_id: "acme".to_string(),
            leave_type,
            monthly_credit: dec(credit),
            max_annual_limit: None,
            is_active: true,
        }
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_tenant(
                TenantConfig::new(
                    "acme",
                    "Acme",
                    vec![rule(LeaveType::Annual, "1.67"), rule(LeaveType::Sick, "0.5")],
                )
                .unwrap(),
            )
            .with_employee(Employee {
                id: "emp_001".to_string(),
                tenant_id: "acme".to_string(),
                joining_date: Some(date(2026, 1, 1)),
            })
    }

    #[test]
    fn test_resolve_window_caps_to_current_month() {
        let window =
            resolve_ledger_window(None, Some(date(2026, 12, 1)), date(2026, 7, 20)).unwrap();
        assert_eq!(window.to, date(2026, 7, 1));
        assert_eq!(window.clip_range().unwrap().end, date(2026, 7, 31));
    }

    #[test]
    fn test_resolve_window_rejects_reversed_bounds() {
        let result = resolve_ledger_window(Some(date(2026, 5, 1)), Some(date(2026, 2, 1)), date(2026, 7, 1));
        assert!(matches!(result, Err(EngineError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_resolve_window_empty_after_cap() {
        let window =
            resolve_ledger_window(Some(date(2026, 9, 1)), None, date(2026, 7, 1)).unwrap();
        assert!(window.is_empty());
        assert!(window.clip_range().is_none());
    }

    #[test]
    fn test_balance_for_new_joiner() {
        let sheet = get_leave_balance(&store(), "emp_001", date(2026, 7, 1)).unwrap();

        assert_eq!(sheet.year, 2026);
        assert_eq!(sheet.months_eligible, 7);
        assert_eq!(sheet.get(LeaveType::Annual).unwrap().total, dec("11.69"));
        assert_eq!(sheet.get(LeaveType::Sick).unwrap().total, dec("3.5"));
        assert_eq!(sheet.audit_trace.steps[0].rule_id, "monthly_accrual");
    }

    #[test]
    fn test_sick_overflow_borrows_from_annual() {
        let source = store().with_approved_leave("emp_001", LeaveType::Sick, date(2026, 3, 2), date(2026, 3, 6));

        let sheet = get_leave_balance(&source, "emp_001", date(2026, 7, 1)).unwrap();
        let sick = sheet.get(LeaveType::Sick).unwrap();
        let annual = sheet.get(LeaveType::Annual).unwrap();

        assert_eq!(sick.used, dec("5"));
        assert_eq!(sick.remaining, Decimal::ZERO);
        assert_eq!(annual.used, dec("1.5"));
        assert_eq!(annual.remaining, dec("10.19"));
        assert!(sheet.get(BalanceKey::Lwp).is_none());
    }

    #[test]
    fn test_missing_tenant_rules_is_prerequisite_error() {
        let source = store().with_employee(Employee {
            id: "emp_009".to_string(),
            tenant_id: "initech".to_string(),
            joining_date: Some(date(2024, 1, 1)),
        });
        assert!(matches!(
            get_leave_balance(&source, "emp_009", date(2026, 7, 1)),
            Err(EngineError::AccrualConfigMissing { .. })
        ));
    }

    #[test]
    fn test_ledger_rows_zero_filled_through_as_of_month() {
        let ledger = get_monthly_ledger(&store(), "emp_001", None, None, date(2026, 7, 1)).unwrap();

        assert_eq!(ledger.rows.len(), 7);
        assert_eq!(ledger.rows[0].year_month, YearMonth::new(2026, 1).unwrap());
        assert_eq!(ledger.rows[6].year_month, YearMonth::new(2026, 7).unwrap());
        assert_eq!(ledger.totals, LedgerTotals::default());
    }

    #[test]
    fn test_ledger_splits_paid_leave_across_months() {
        let source = store().with_approved_leave("emp_001", LeaveType::Annual, date(2026, 1, 28), date(2026, 2, 7));
        let as_of = date(2026, 12, 1);

        let ledger = get_monthly_ledger(&source, "emp_001", None, None, as_of).unwrap();
        let jan = ledger.row(YearMonth::new(2026, 1).unwrap()).unwrap();
        let feb = ledger.row(YearMonth::new(2026, 2).unwrap()).unwrap();

        assert_eq!(jan.paid_days + jan.unpaid_days + feb.paid_days + feb.unpaid_days, 11);
        assert_eq!(ledger.totals.paid_days + ledger.totals.unpaid_days, 11);
    }

    #[test]
    fn test_ledger_steps_follow_balance_steps() {
        let source = store()
            .with_approved_leave("emp_001", LeaveType::Sick, date(2026, 3, 2), date(2026, 3, 3))
            .with_approved_leave("emp_001", LeaveType::Annual, date(2026, 4, 6), date(2026, 4, 7));

        let ledger = get_monthly_ledger(&source, "emp_001", None, None, date(2026, 7, 1)).unwrap();
        let numbers: Vec<u32> = ledger.audit_trace.steps.iter().map(|s| s.step_number).collect();
        let expected: Vec<u32> = (1..=numbers.len() as u32).collect();

        assert_eq!(numbers, expected);
        assert!(ledger.audit_trace.has_warning(WARNING_SHARED_BALANCE_SNAPSHOT));
    }

    #[test]
    fn test_empty_window_yields_no_rows() {
        let ledger =
            get_monthly_ledger(&store(), "emp_001", Some(date(2026, 9, 1)), None, date(2026, 7, 1))
                .unwrap();
        assert!(ledger.rows.is_empty());
        assert_eq!(ledger.totals, LedgerTotals::default());
    }

    #[test]
    fn test_ledger_reversed_window_is_invalid_input() {
        let result = get_monthly_ledger(
            &store(),
            "emp_001",
            Some(date(2026, 5, 1)),
            Some(date(2026, 2, 1)),
            date(2026, 7, 1),
        );
        assert!(matches!(result, Err(EngineError::InvalidDateRange { .. })));
    }
}
