//! Approved leave interval model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DateRange, LeaveType};
use crate::error::{EngineError, EngineResult};

/// An approved leave booking covering whole days from `start_date` to
/// `end_date` inclusive.
///
/// Pending, rejected and cancelled requests never reach the engine.
///
/// # Example
///
/// ```
/// use leave_engine::models::{ApprovedLeaveInterval, LeaveType};
/// use chrono::NaiveDate;
///
/// let leave = ApprovedLeaveInterval {
///     leave_type: LeaveType::Sick,
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
/// };
/// assert_eq!(leave.range().unwrap().days(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedLeaveInterval {
    /// The type of leave taken.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
}

impl ApprovedLeaveInterval {
    /// Returns the interval as a date range.
    ///
    /// An interval that ends before it starts is reported as invalid input
    /// rather than silently swapped or dropped.
    pub fn range(&self) -> EngineResult<DateRange> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidLeaveInterval {
                leave_type: self.leave_type,
                start_date: self.start_date,
                end_date: self.end_date,
            });
        }
        Ok(DateRange {
            start: self.start_date,
            end: self.end_date,
        })
    }
}
