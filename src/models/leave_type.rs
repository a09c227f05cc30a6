//! Leave type and balance key definitions.
//!
//! Leave types form a closed set so the reconciliation logic can match on
//! them exhaustively. [`BalanceKey`] extends the set with the synthetic
//! leave-without-pay bucket that only ever appears in computed balances.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A kind of leave an employee can take.
///
/// # Example
///
/// ```
/// use leave_engine::models::LeaveType;
///
/// assert_eq!(LeaveType::Annual.to_string(), "annual");
/// assert!(LeaveType::Unpaid.is_unpaid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Annual (earned) leave. Its unused entitlement absorbs overflow from
    /// every other type.
    Annual,
    /// Sick leave.
    Sick,
    /// Casual leave.
    Casual,
    /// Maternity leave.
    Maternity,
    /// Paternity leave.
    Paternity,
    /// Compensatory leave granted for extra days worked.
    Compensatory,
    /// Leave explicitly booked as unpaid.
    Unpaid,
}

impl LeaveType {
    /// Every leave type, in display order.
    pub const ALL: [LeaveType; 7] = [
        LeaveType::Annual,
        LeaveType::Sick,
        LeaveType::Casual,
        LeaveType::Maternity,
        LeaveType::Paternity,
        LeaveType::Compensatory,
        LeaveType::Unpaid,
    ];

    /// Returns the wire name of this leave type.
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Casual => "casual",
            LeaveType::Maternity => "maternity",
            LeaveType::Paternity => "paternity",
            LeaveType::Compensatory => "compensatory",
            LeaveType::Unpaid => "unpaid",
        }
    }

    /// Returns true for the shared annual bucket.
    pub fn is_annual(self) -> bool {
        self == LeaveType::Annual
    }

    /// Returns true when every day of this type is unpaid by definition.
    pub fn is_unpaid(self) -> bool {
        self == LeaveType::Unpaid
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        LeaveType::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| format!("Invalid leave type: {}", s))
    }
}

/// Key of a computed balance map.
///
/// Either a real leave type or the synthetic `lwp` bucket that collects
/// consumption no entitlement could cover. Serialized as a plain string so
/// balance maps render as `{"annual": {...}, "lwp": {...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BalanceKey {
    /// A configured leave type.
    Leave(LeaveType),
    /// Leave without pay.
    Lwp,
}

impl BalanceKey {
    /// Wire name of the synthetic leave-without-pay bucket.
    pub const LWP: &'static str = "lwp";
}

impl From<LeaveType> for BalanceKey {
    fn from(leave_type: LeaveType) -> Self {
        BalanceKey::Leave(leave_type)
    }
}

impl fmt::Display for BalanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceKey::Leave(leave_type) => leave_type.fmt(f),
            BalanceKey::Lwp => f.write_str(Self::LWP),
        }
    }
}

impl FromStr for BalanceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(Self::LWP) {
            return Ok(BalanceKey::Lwp);
        }
        s.parse().map(BalanceKey::Leave)
    }
}

impl Serialize for BalanceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BalanceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
