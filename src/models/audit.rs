//! Audit trace models.
//!
//! Every balance or ledger calculation records the decisions it made as a
//! sequence of [`AuditStep`]s, plus [`AuditWarning`]s for policy edges that
//! are intentional but worth surfacing (clamped overuse, rounding drift).

use serde::{Deserialize, Serialize};

/// Warning code: annual leave was used beyond its own entitlement and the
/// excess was clamped rather than recorded as leave without pay.
pub const WARNING_ANNUAL_OVERUSE_CLAMPED: &str = "ANNUAL_OVERUSE_CLAMPED";

/// Warning code: annual leave was paid beyond remaining annual balance
/// because the ledger's available balance counts remaining annual twice.
pub const WARNING_ANNUAL_BALANCE_DOUBLE_COUNTED: &str = "ANNUAL_BALANCE_DOUBLE_COUNTED";

/// Warning code: per-month rounding did not reconstitute an interval's days.
pub const WARNING_LEDGER_ROUNDING_DRIFT: &str = "LEDGER_ROUNDING_DRIFT";

/// Warning code: several intervals were classified against one un-decremented
/// balance snapshot.
pub const WARNING_SHARED_BALANCE_SNAPSHOT: &str = "SHARED_BALANCE_SNAPSHOT";

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings never abort a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use leave_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// assert!(!trace.has_warning("LEDGER_ROUNDING_DRIFT"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Returns true if a warning with the given code was recorded.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}
