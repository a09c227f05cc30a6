//! Query-string types for the Leave Engine API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Query for `GET /employees/:id/leave-balance`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceQuery {
    /// Date to compute balances as of. Defaults to today (UTC).
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Query for `GET /employees/:id/leave-ledger`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerQuery {
    /// First day of the ledger. Defaults to January 1 of the as-of year.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Last ledger month. Capped at the as-of month.
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Date balances are computed as of. Defaults to today (UTC).
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}
