//! Accrual rule model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LeaveType;

/// Monthly accrual configuration for one leave type of one tenant.
///
/// Rules are owned by tenant administrators and are read-only to the
/// engine. At most one active rule exists per (tenant, leave type).
///
/// # Example
///
/// ```
/// use leave_engine::models::{AccrualRule, LeaveType};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rule = AccrualRule {
///     tenant_id: "acme".to_string(),
///     leave_type: LeaveType::Annual,
///     monthly_credit: Decimal::from_str("1.67").unwrap(),
///     max_annual_limit: Some(Decimal::from(20)),
///     is_active: true,
/// };
/// assert!(rule.is_capped());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualRule {
    /// The tenant the rule belongs to.
    pub tenant_id: String,
    /// The leave type credited by this rule.
    pub leave_type: LeaveType,
    /// Days credited per eligible calendar month.
    pub monthly_credit: Decimal,
    /// Optional ceiling on the yearly entitlement.
    pub max_annual_limit: Option<Decimal>,
    /// Inactive rules are ignored by the engine.
    pub is_active: bool,
}

impl AccrualRule {
    /// Returns true if the yearly entitlement is capped.
    pub fn is_capped(&self) -> bool {
        self.max_annual_limit.is_some()
    }
}
