//! Monthly paid/unpaid ledger models consumed by payroll.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AuditTrace, YearMonth};

/// Paid and unpaid leave days attributed to one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The month the days fall in.
    pub year_month: YearMonth,
    /// Leave days covered by entitlement.
    pub paid_days: u32,
    /// Leave days to be deducted from salary.
    pub unpaid_days: u32,
}

impl LedgerRow {
    /// Creates a zero-filled row for a month.
    pub fn empty(year_month: YearMonth) -> Self {
        Self {
            year_month,
            paid_days: 0,
            unpaid_days: 0,
        }
    }
}

/// Sums over every row of a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Total paid days.
    pub paid_days: u32,
    /// Total unpaid days.
    pub unpaid_days: u32,
}

impl LedgerTotals {
    /// Adds up a set of rows.
    pub fn from_rows(rows: &[LedgerRow]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| Self {
            paid_days: acc.paid_days + row.paid_days,
            unpaid_days: acc.unpaid_days + row.unpaid_days,
        })
    }
}

/// One employee's month-by-month leave ledger.
///
/// Rows are in ascending month order, one per month of the window,
/// including months without any leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyLedger {
    /// The employee the ledger belongs to.
    pub employee_id: String,
    /// First day of the resolved window.
    pub from: NaiveDate,
    /// Last month of the resolved window, as its first day.
    pub to: NaiveDate,
    /// Month rows.
    pub rows: Vec<LedgerRow>,
    /// Sums over all rows.
    pub totals: LedgerTotals,
    /// Decisions made while building the ledger.
    pub audit_trace: AuditTrace,
}

impl MonthlyLedger {
    /// Returns the row for a month, if it is inside the window.
    pub fn row(&self, year_month: YearMonth) -> Option<&LedgerRow> {
        self.rows.iter().find(|r| r.year_month == year_month)
    }
}
