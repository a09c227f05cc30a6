//! Error types for the Leave Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing leave balances
//! and monthly ledgers.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::LeaveType;

/// Broad classification of an [`EngineError`].
///
/// Callers use the kind to decide how an error is surfaced: prerequisite
/// errors map to "not found", invalid input to "bad request", and
/// configuration errors to an internal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required record (employee, join date, tenant rule set) is absent.
    PrerequisiteMissing,
    /// The caller supplied malformed or non-chronological input.
    InvalidInput,
    /// Configuration could not be loaded or is internally inconsistent.
    Configuration,
}

/// The main error type for the Leave Engine.
///
/// # Example
///
/// ```
/// use leave_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound {
///     employee_id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The id that was looked up.
        employee_id: String,
    },

    /// The employee exists but has no joining date on record.
    #[error("Employee '{employee_id}' has no joining date")]
    JoiningDateMissing {
        /// The employee missing a joining date.
        employee_id: String,
    },

    /// The tenant has no accrual rule set at all.
    #[error("Accrual configuration not found for tenant '{tenant_id}'")]
    AccrualConfigMissing {
        /// The tenant whose rule set is missing.
        tenant_id: String,
    },

    /// A requested date range starts after it ends.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// The requested start.
        from: NaiveDate,
        /// The requested end.
        to: NaiveDate,
    },

    /// An approved leave interval ends before it starts.
    #[error("Invalid {leave_type} leave interval: ends {end_date} before it starts {start_date}")]
    InvalidLeaveInterval {
        /// The leave type of the offending interval.
        leave_type: LeaveType,
        /// The interval start.
        start_date: NaiveDate,
        /// The interval end.
        end_date: NaiveDate,
    },

    /// An accrual rule carries values the engine cannot accept.
    #[error("Invalid accrual rule for tenant '{tenant_id}' ({leave_type}): {message}")]
    InvalidAccrualRule {
        /// The tenant owning the rule.
        tenant_id: String,
        /// The rule's leave type.
        leave_type: LeaveType,
        /// What is wrong with the rule.
        message: String,
    },

    /// More than one active rule exists for the same tenant and leave type.
    #[error("Duplicate active accrual rule for tenant '{tenant_id}' ({leave_type})")]
    DuplicateAccrualRule {
        /// The tenant owning the rules.
        tenant_id: String,
        /// The duplicated leave type.
        leave_type: LeaveType,
    },
}

impl EngineError {
    /// Returns the broad kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::EmployeeNotFound { .. }
            | EngineError::JoiningDateMissing { .. }
            | EngineError::AccrualConfigMissing { .. } => ErrorKind::PrerequisiteMissing,
            EngineError::InvalidDateRange { .. } | EngineError::InvalidLeaveInterval { .. } => {
                ErrorKind::InvalidInput
            }
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidAccrualRule { .. }
            | EngineError::DuplicateAccrualRule { .. } => ErrorKind::Configuration,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
