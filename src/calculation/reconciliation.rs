//! Cascading balance reconciliation.
//!
//! Every non-annual leave type first consumes its own entitlement. Overflow
//! beyond that is covered from unused annual entitlement, a pool shared by
//! all types and drawn down monotonically. Whatever annual cannot cover
//! becomes leave without pay (LWP).
//!
//! ## Policy edges
//!
//! - Annual leave used beyond its own entitlement is clamped to zero
//!   remaining and is **not** counted as LWP. Only overflow from other
//!   types becomes LWP. The asymmetry is kept as-is and reported as an
//!   [`WARNING_ANNUAL_OVERUSE_CLAMPED`] audit warning.
//! - A non-annual type's own `remaining` ignores borrowing; borrowing only
//!   shows up in the annual bucket's `used`.
//! - Usage of a leave type without an active rule, and of explicitly unpaid
//!   leave, has no bucket of its own and goes straight to LWP.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rounding::round_2dp;
use crate::models::{
    AuditStep, AuditWarning, BalanceKey, LeaveType, TypeBalance, WARNING_ANNUAL_OVERUSE_CLAMPED,
};

/// How one non-annual leave type was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSettlement {
    /// The leave type settled.
    pub leave_type: LeaveType,
    /// Entitlement of the type.
    pub total: Decimal,
    /// Days consumed of the type.
    pub used: Decimal,
    /// `max(0, used - total)`.
    pub overflow: Decimal,
    /// Part of the overflow covered from annual entitlement.
    pub borrowed: Decimal,
    /// Part of the overflow left uncovered, recorded as LWP.
    pub uncovered: Decimal,
}

/// The result of reconciling entitlement against consumption.
#[derive(Debug, Clone)]
pub struct ReconciliationResult {
    /// Final balances keyed by leave type, plus `lwp` when non-zero.
    pub balances: BTreeMap<BalanceKey, TypeBalance>,
    /// Settlement detail for every configured non-annual type.
    pub settlements: Vec<TypeSettlement>,
    /// Annual entitlement drawn down by other types' overflow.
    pub annual_borrowed: Decimal,
    /// Annual days used directly beyond annual entitlement and clamped away.
    pub annual_overuse_clamped: Decimal,
    /// LWP arising from uncovered overflow of configured types.
    pub lwp_from_overflow: Decimal,
    /// LWP from unpaid or unconfigured leave types.
    pub lwp_direct: Decimal,
    /// Audit steps recorded during reconciliation.
    pub audit_steps: Vec<AuditStep>,
    /// Policy-edge warnings.
    pub warnings: Vec<AuditWarning>,
}

impl ReconciliationResult {
    /// Total leave-without-pay days.
    pub fn lwp(&self) -> Decimal {
        self.lwp_from_overflow + self.lwp_direct
    }
}

/// Reconciles per-type entitlement against per-type consumption.
///
/// Non-annual types are processed in [`LeaveType`] order. Because annual
/// capacity is a shared pool consumed monotonically, the resulting LWP
/// total does not depend on that order.
///
/// # Arguments
///
/// * `totals` - Entitlement per configured leave type
/// * `used` - Days consumed per leave type
/// * `step_number_start` - The first step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use leave_engine::calculation::reconcile_balances;
/// use leave_engine::models::{BalanceKey, LeaveType};
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let totals = BTreeMap::from([
///     (LeaveType::Annual, dec("11.69")),
///     (LeaveType::Sick, dec("3.5")),
/// ]);
/// let used = BTreeMap::from([(LeaveType::Sick, dec("5"))]);
///
/// let result = reconcile_balances(&totals, &used, 1);
/// let annual = result.balances[&BalanceKey::Leave(LeaveType::Annual)];
/// assert_eq!(annual.used, dec("1.5"));
/// assert_eq!(annual.remaining, dec("10.19"));
/// assert_eq!(result.lwp(), Decimal::ZERO);
/// ```
pub fn reconcile_balances(
    totals: &BTreeMap<LeaveType, Decimal>,
    used: &BTreeMap<LeaveType, Decimal>,
    step_number_start: u32,
) -> ReconciliationResult {
    let mut step_number = step_number_start;
    let mut audit_steps = Vec::new();
    let mut warnings = Vec::new();
    let mut balances = BTreeMap::new();
    let mut settlements = Vec::new();

    let used_of = |t: LeaveType| used.get(&t).copied().unwrap_or(Decimal::ZERO);

    let annual_configured = totals.contains_key(&LeaveType::Annual);
    let annual_total = totals
        .get(&LeaveType::Annual)
        .copied()
        .unwrap_or(Decimal::ZERO);
    let annual_used_direct = used_of(LeaveType::Annual);
    let annual_capacity = (annual_total - annual_used_direct).max(Decimal::ZERO);
    let annual_overuse_clamped = (annual_used_direct - annual_total).max(Decimal::ZERO);
    let mut annual_remaining = annual_capacity;

    if annual_overuse_clamped > Decimal::ZERO {
        debug!(
            annual_total = %annual_total,
            annual_used = %annual_used_direct,
            clamped = %annual_overuse_clamped,
            "Annual overuse clamped, not counted as leave without pay"
        );
        warnings.push(AuditWarning::new(
            WARNING_ANNUAL_OVERUSE_CLAMPED,
            format!(
                "Annual leave used {} exceeds entitlement {}; {} day(s) clamped and not recorded as leave without pay",
                annual_used_direct.normalize(),
                annual_total.normalize(),
                annual_overuse_clamped.normalize()
            ),
            "medium",
        ));
    }

    let mut lwp_from_overflow = Decimal::ZERO;
    for (&leave_type, &total) in totals
        .iter()
        .filter(|(t, _)| !t.is_annual() && !t.is_unpaid())
    {
        let type_used = used_of(leave_type);
        let overflow = (type_used - total).max(Decimal::ZERO);
        let borrowed = overflow.min(annual_remaining);
        annual_remaining -= borrowed;
        let uncovered = overflow - borrowed;
        lwp_from_overflow += uncovered;

        balances.insert(
            BalanceKey::Leave(leave_type),
            TypeBalance::new(round_2dp(total), round_2dp(type_used)),
        );

        let settlement = TypeSettlement {
            leave_type,
            total,
            used: type_used,
            overflow,
            borrowed,
            uncovered,
        };
        settlements.push(settlement);

        if overflow > Decimal::ZERO {
            audit_steps.push(AuditStep {
                step_number,
                rule_id: "cascade_to_annual".to_string(),
                rule_name: "Cascade Overflow To Annual".to_string(),
                input: serde_json::json!({
                    "leave_type": leave_type,
                    "total": total.to_string(),
                    "used": type_used.to_string(),
                    "annual_available": (annual_remaining + borrowed).to_string(),
                }),
                output: serde_json::json!({
                    "overflow": overflow.to_string(),
                    "borrowed_from_annual": borrowed.to_string(),
                    "uncovered": uncovered.to_string(),
                    "annual_remaining": annual_remaining.to_string(),
                }),
                reasoning: if uncovered > Decimal::ZERO {
                    format!(
                        "{} overflow of {} day(s): {} covered by annual, {} recorded as leave without pay",
                        leave_type,
                        overflow.normalize(),
                        borrowed.normalize(),
                        uncovered.normalize()
                    )
                } else {
                    format!(
                        "{} overflow of {} day(s) fully covered by annual",
                        leave_type,
                        overflow.normalize()
                    )
                },
            });
            step_number += 1;
        }
    }

    let annual_borrowed = (annual_capacity - annual_remaining).max(Decimal::ZERO);
    if annual_configured {
        balances.insert(
            BalanceKey::Leave(LeaveType::Annual),
            TypeBalance::new(
                round_2dp(annual_total),
                round_2dp(annual_used_direct + annual_borrowed),
            ),
        );
    }

    let lwp_direct: Decimal = used
        .iter()
        .filter(|(t, _)| !t.is_annual() && (t.is_unpaid() || !totals.contains_key(*t)))
        .map(|(_, days)| *days)
        .sum();

    let lwp = lwp_from_overflow + lwp_direct;
    if lwp > Decimal::ZERO {
        balances.insert(
            BalanceKey::Lwp,
            TypeBalance {
                total: Decimal::ZERO,
                used: round_2dp(lwp),
                remaining: Decimal::ZERO,
            },
        );
    }

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "lwp_classification".to_string(),
        rule_name: "Leave Without Pay Classification".to_string(),
        input: serde_json::json!({
            "annual_total": annual_total.to_string(),
            "annual_used_direct": annual_used_direct.to_string(),
        }),
        output: serde_json::json!({
            "annual_borrowed": annual_borrowed.to_string(),
            "lwp_from_overflow": lwp_from_overflow.to_string(),
            "lwp_direct": lwp_direct.to_string(),
            "lwp": lwp.to_string(),
        }),
        reasoning: format!(
            "Annual absorbed {} day(s) of overflow; {} day(s) recorded as leave without pay",
            annual_borrowed.normalize(),
            lwp.normalize()
        ),
    });

    ReconciliationResult {
        balances,
        settlements,
        annual_borrowed,
        annual_overuse_clamped,
        lwp_from_overflow,
        lwp_direct,
        audit_steps,
        warnings,
    }
}
