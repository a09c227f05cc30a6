//! Computed leave balance models.
//!
//! Balances are never stored; every query derives a fresh
//! [`LeaveBalanceSheet`] from the accrual rules and approved leave.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditTrace, BalanceKey, LeaveType};

/// Entitlement, consumption and what is left for one balance bucket.
///
/// # Example
///
/// ```
/// use leave_engine::models::TypeBalance;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let balance = TypeBalance::new(Decimal::from_str("3.5").unwrap(), Decimal::from(5));
/// assert_eq!(balance.remaining, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBalance {
    /// Entitlement accrued to date.
    pub total: Decimal,
    /// Days consumed.
    pub used: Decimal,
    /// `max(0, total - used)`.
    pub remaining: Decimal,
}

impl TypeBalance {
    /// Creates a balance, deriving `remaining` from `total` and `used`.
    pub fn new(total: Decimal, used: Decimal) -> Self {
        Self {
            total,
            used,
            remaining: (total - used).max(Decimal::ZERO),
        }
    }
}

/// The full balance picture for one employee as of a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalanceSheet {
    /// The employee the balances belong to.
    pub employee_id: String,
    /// The date the balances were computed as of.
    pub as_of: NaiveDate,
    /// The calendar year entitlement and consumption are measured in.
    pub year: i32,
    /// Calendar months of accrual credited so far this year.
    pub months_eligible: u32,
    /// Balance per configured leave type, plus `lwp` when any consumption
    /// went uncovered.
    pub balances: BTreeMap<BalanceKey, TypeBalance>,
    /// Decisions made while computing the balances.
    pub audit_trace: AuditTrace,
}

impl LeaveBalanceSheet {
    /// Returns the balance for a key, if present.
    pub fn get(&self, key: impl Into<BalanceKey>) -> Option<&TypeBalance> {
        self.balances.get(&key.into())
    }

    /// Remaining days of a leave type, zero when the type is unconfigured.
    pub fn remaining(&self, leave_type: LeaveType) -> Decimal {
        self.get(leave_type)
            .map(|b| b.remaining)
            .unwrap_or(Decimal::ZERO)
    }

    /// Days recorded as leave without pay.
    pub fn lwp_days(&self) -> Decimal {
        self.get(BalanceKey::Lwp)
            .map(|b| b.used)
            .unwrap_or(Decimal::ZERO)
    }
}
