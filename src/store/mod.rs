//! Read access to the records the engine depends on.
//!
//! The engine owns none of its inputs. Accrual rules belong to tenant
//! administrators, employees to HR, and leave requests to the approval
//! workflow. [`LeaveDataSource`] is the narrow read contract over all three.

mod memory;

pub use memory::{InMemoryStore, LeaveRequest, LeaveStatus};

use crate::error::EngineResult;
use crate::models::{AccrualRule, ApprovedLeaveInterval, DateRange, Employee};

/// Read-only access to accrual rules, employees and approved leave.
///
/// Implementations must be safe to share between request handlers.
pub trait LeaveDataSource: Send + Sync {
    /// Lists a tenant's active accrual rules.
    ///
    /// Fails with `AccrualConfigMissing` when the tenant has no rule set.
    fn active_accrual_rules(&self, tenant_id: &str) -> EngineResult<Vec<AccrualRule>>;

    /// Looks up an employee.
    ///
    /// Fails with `EmployeeNotFound` when the id is unknown.
    fn employee(&self, employee_id: &str) -> EngineResult<Employee>;

    /// Lists an employee's approved leave.
    ///
    /// With `within`, only intervals touching that range are returned,
    /// unclipped.
    fn approved_leaves(
        &self,
        employee_id: &str,
        within: Option<&DateRange>,
    ) -> EngineResult<Vec<ApprovedLeaveInterval>>;
}
