//! In-memory data source backed by YAML files.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::LeaveDataSource;
use crate::config::{AccrualConfig, TenantConfig, load_yaml};
use crate::error::{EngineError, EngineResult};
use crate::models::{AccrualRule, ApprovedLeaveInterval, DateRange, Employee, LeaveType};

/// Workflow state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; counts against entitlement.
    Approved,
    /// Turned down.
    Rejected,
    /// Withdrawn by the employee.
    Cancelled,
}

/// A leave request as recorded by the approval workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Request identifier.
    pub id: String,
    /// The requesting employee.
    pub employee_id: String,
    /// The type of leave requested.
    pub leave_type: LeaveType,
    /// First day requested.
    pub start_date: NaiveDate,
    /// Last day requested (inclusive).
    pub end_date: NaiveDate,
    /// Current workflow state.
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Returns true once the request has been approved.
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    fn touches(&self, range: &DateRange) -> bool {
        // Reversed requests are still surfaced so the engine can reject them.
        let first = self.start_date.min(self.end_date);
        let last = self.start_date.max(self.end_date);
        first <= range.end && last >= range.start
    }

    fn to_interval(&self) -> ApprovedLeaveInterval {
        ApprovedLeaveInterval {
            leave_type: self.leave_type,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmployeeRecord {
    id: String,
    #[serde(default)]
    tenant_id: Option<String>,
    #[serde(default)]
    joining_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct EmployeesFile {
    employees: Vec<EmployeeRecord>,
}

#[derive(Debug, Deserialize)]
struct LeaveRequestsFile {
    #[serde(default)]
    leave_requests: Vec<LeaveRequest>,
}

/// A [`LeaveDataSource`] holding every record in memory.
///
/// # Example
///
/// ```
/// use leave_engine::store::{InMemoryStore, LeaveDataSource};
/// use leave_engine::models::{Employee, LeaveType};
/// use chrono::NaiveDate;
///
/// let store = InMemoryStore::new()
///     .with_employee(Employee {
///         id: "emp_001".to_string(),
///         tenant_id: "acme".to_string(),
///         joining_date: NaiveDate::from_ymd_opt(2026, 1, 1),
///     })
///     .with_approved_leave(
///         "emp_001",
///         LeaveType::Sick,
///         NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///         NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
///     );
///
/// assert_eq!(store.approved_leaves("emp_001", None).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    accrual: AccrualConfig,
    employees: HashMap<String, Employee>,
    requests: Vec<LeaveRequest>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store over already-loaded accrual rules.
    pub fn with_accrual(accrual: AccrualConfig) -> Self {
        Self {
            accrual,
            ..Self::default()
        }
    }

    /// Loads `employees.yaml` and `leave_requests.yaml` from `path`.
    ///
    /// Employees recorded without a tenant are assigned `default_tenant`.
    /// A missing `leave_requests.yaml` means no leave has been requested.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` if `employees.yaml` is missing
    /// - `ConfigParseError` if a file is malformed, or an employee has no
    ///   tenant and no default is configured
    pub fn load<P: AsRef<Path>>(
        path: P,
        accrual: AccrualConfig,
        default_tenant: Option<&str>,
    ) -> EngineResult<Self> {
        let path = path.as_ref();
        let employees_path = path.join("employees.yaml");
        let employees_file = load_yaml::<EmployeesFile>(&employees_path)?;

        let mut store = Self::with_accrual(accrual);
        for record in employees_file.employees {
            let tenant_id = record
                .tenant_id
                .or_else(|| default_tenant.map(str::to_string))
                .ok_or_else(|| EngineError::ConfigParseError {
                    path: employees_path.display().to_string(),
                    message: format!("employee '{}' has no tenant_id", record.id),
                })?;
            store = store.with_employee(Employee {
                id: record.id,
                tenant_id,
                joining_date: record.joining_date,
            });
        }

        let requests_path = path.join("leave_requests.yaml");
        if requests_path.exists() {
            let requests = load_yaml::<LeaveRequestsFile>(&requests_path)?;
            store.requests = requests.leave_requests;
        }

        Ok(store)
    }

    /// Adds or replaces a tenant's accrual rules.
    pub fn with_tenant(mut self, tenant: TenantConfig) -> Self {
        self.accrual.insert(tenant);
        self
    }

    /// Adds or replaces an employee.
    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.employees.insert(employee.id.clone(), employee);
        self
    }

    /// Records a leave request in any state.
    pub fn with_leave_request(mut self, request: LeaveRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Records an approved leave request with a generated id.
    pub fn with_approved_leave(
        self,
        employee_id: &str,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let id = format!("req_{}", self.requests.len() + 1);
        self.with_leave_request(LeaveRequest {
            id,
            employee_id: employee_id.to_string(),
            leave_type,
            start_date,
            end_date,
            status: LeaveStatus::Approved,
        })
    }

    /// Number of employees held.
    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    /// Every recorded request, in insertion order.
    pub fn requests(&self) -> &[LeaveRequest] {
        &self.requests
    }
}

impl LeaveDataSource for InMemoryStore {
    fn active_accrual_rules(&self, tenant_id: &str) -> EngineResult<Vec<AccrualRule>> {
        self.accrual
            .tenant(tenant_id)
            .map(|t| t.active_rules().cloned().collect())
            .ok_or_else(|| EngineError::AccrualConfigMissing {
                tenant_id: tenant_id.to_string(),
            })
    }

    fn employee(&self, employee_id: &str) -> EngineResult<Employee> {
        self.employees
            .get(employee_id)
            .cloned()
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    fn approved_leaves(
        &self,
        employee_id: &str,
        within: Option<&DateRange>,
    ) -> EngineResult<Vec<ApprovedLeaveInterval>> {
        Ok(self
            .requests
            .iter()
            .filter(|r| r.employee_id == employee_id && r.is_approved())
            .filter(|r| within.is_none_or(|range| r.touches(range)))
            .map(LeaveRequest::to_interval)
            .collect())
    }
}
