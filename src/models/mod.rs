//! Core data models for the Leave Engine.
//!
//! This module contains all the domain models used throughout the engine:
//! the inputs read from collaborators (rules, employees, approved leave) and
//! the computed, never-persisted outputs (balances, ledger rows).

mod accrual_rule;
mod audit;
mod balance;
mod date_range;
mod employee;
mod leave_interval;
mod leave_type;
mod ledger;
mod year_month;

pub use accrual_rule::AccrualRule;
pub use audit::{
    AuditStep, AuditTrace, AuditWarning, WARNING_ANNUAL_BALANCE_DOUBLE_COUNTED,
    WARNING_ANNUAL_OVERUSE_CLAMPED, WARNING_LEDGER_ROUNDING_DRIFT,
    WARNING_SHARED_BALANCE_SNAPSHOT,
};
pub use balance::{LeaveBalanceSheet, TypeBalance};
pub use date_range::DateRange;
pub use employee::Employee;
pub use leave_interval::ApprovedLeaveInterval;
pub use leave_type::{BalanceKey, LeaveType};
pub use ledger::{LedgerRow, LedgerTotals, MonthlyLedger};
pub use year_month::YearMonth;
