//! Employee snapshot model.
//!
//! The engine only ever needs an employee's identity, tenant and joining
//! date; everything else about the employee lives with the HR collaborator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An immutable snapshot of the employee fields the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The tenant (company) the employee belongs to.
    pub tenant_id: String,
    /// The date the employee joined. Records imported without one are
    /// kept as `None` and rejected at calculation time.
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
}

impl Employee {
    /// Returns the joining date, or a prerequisite error when it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_engine::models::Employee;
    /// use chrono::NaiveDate;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     tenant_id: "acme".to_string(),
    ///     joining_date: Some(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()),
    /// };
    /// assert_eq!(
    ///     employee.require_joining_date().unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    /// );
    /// ```
    pub fn require_joining_date(&self) -> EngineResult<NaiveDate> {
        self.joining_date
            .ok_or_else(|| EngineError::JoiningDateMissing {
                employee_id: self.id.clone(),
            })
    }
}
