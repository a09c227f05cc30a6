//! Configuration types for the Leave Engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the validated
//! per-tenant rule sets built from them.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{AccrualRule, LeaveType};

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_active() -> bool {
    true
}

/// HTTP server settings from `server.yaml`.
///
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// The interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// The port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Tenant assumed for employees imported without one.
    #[serde(default)]
    pub default_tenant: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_tenant: None,
        }
    }
}

impl ServerSettings {
    /// Returns `host:port` for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// One accrual rule as written in a tenant file.
///
/// The tenant id comes from the enclosing file.
#[derive(Debug, Clone, Deserialize)]
pub struct AccrualRuleEntry {
    /// The leave type credited.
    pub leave_type: LeaveType,
    /// Days credited per month.
    pub monthly_credit: Decimal,
    /// Optional yearly ceiling.
    #[serde(default)]
    pub max_annual_limit: Option<Decimal>,
    /// Defaults to active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl AccrualRuleEntry {
    /// Attaches the owning tenant to the entry.
    pub fn into_rule(self, tenant_id: &str) -> AccrualRule {
        AccrualRule {
            tenant_id: tenant_id.to_string(),
            leave_type: self.leave_type,
            monthly_credit: self.monthly_credit,
            max_annual_limit: self.max_annual_limit,
            is_active: self.is_active,
        }
    }
}

/// A `tenants/<tenant>.yaml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantRulesFile {
    /// The tenant identifier.
    pub tenant_id: String,
    /// Display name of the tenant.
    pub name: String,
    /// The tenant's accrual rules.
    #[serde(default)]
    pub rules: Vec<AccrualRuleEntry>,
}

/// A tenant and its validated accrual rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantConfig {
    tenant_id: String,
    name: String,
    rules: Vec<AccrualRule>,
}

impl TenantConfig {
    /// Creates a tenant rule set, validating every rule.
    ///
    /// Rules for unpaid leave are dropped with a warning, since unpaid leave
    /// never accrues.
    ///
    /// # Errors
    ///
    /// - `InvalidAccrualRule` if a rule has a negative credit or limit, or
    ///   names a different tenant
    /// - `DuplicateAccrualRule` if two active rules share a leave type
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::config::TenantConfig;
    /// use leave_engine::models::{AccrualRule, LeaveType};
    /// use rust_decimal::Decimal;
    ///
    /// let annual = AccrualRule {
    ///     tenant_id: "acme".to_string(),
    ///     leave_type: LeaveType::Annual,
    ///     monthly_credit: Decimal::new(167, 2),
    ///     max_annual_limit: None,
    ///     is_active: true,
    /// };
    /// let tenant = TenantConfig::new("acme", "Acme Pty Ltd", vec![annual]).unwrap();
    /// assert_eq!(tenant.active_rules().count(), 1);
    /// ```
    pub fn new(
        tenant_id: impl Into<String>,
        name: impl Into<String>,
        rules: Vec<AccrualRule>,
    ) -> EngineResult<Self> {
        let tenant_id = tenant_id.into();
        let mut active_types = HashSet::new();

        let rules: Vec<AccrualRule> = rules
            .into_iter()
            .filter(|rule| {
                if rule.leave_type.is_unpaid() {
                    warn!(
                        tenant_id = %tenant_id,
                        monthly_credit = %rule.monthly_credit,
                        "Ignoring accrual rule for unpaid leave"
                    );
                    return false;
                }
                true
            })
            .collect();

        for rule in &rules {
            let invalid = |message: &str| EngineError::InvalidAccrualRule {
                tenant_id: tenant_id.clone(),
                leave_type: rule.leave_type,
                message: message.to_string(),
            };

            if rule.tenant_id != tenant_id {
                return Err(invalid("rule belongs to a different tenant"));
            }
            if rule.monthly_credit < Decimal::ZERO {
                return Err(invalid("monthly_credit must not be negative"));
            }
            if rule.max_annual_limit.is_some_and(|l| l < Decimal::ZERO) {
                return Err(invalid("max_annual_limit must not be negative"));
            }
            if rule.is_active && !active_types.insert(rule.leave_type) {
                return Err(EngineError::DuplicateAccrualRule {
                    tenant_id: tenant_id.clone(),
                    leave_type: rule.leave_type,
                });
            }
        }

        Ok(Self {
            tenant_id,
            name: name.into(),
            rules,
        })
    }

    /// Builds a tenant rule set from a parsed tenant file.
    pub fn from_file(file: TenantRulesFile) -> EngineResult<Self> {
        let rules = file
            .rules
            .into_iter()
            .map(|entry| entry.into_rule(&file.tenant_id))
            .collect();
        Self::new(file.tenant_id, file.name, rules)
    }

    /// The tenant identifier.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// The tenant's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every rule, active or not.
    pub fn rules(&self) -> &[AccrualRule] {
        &self.rules
    }

    /// Rules the engine applies.
    pub fn active_rules(&self) -> impl Iterator<Item = &AccrualRule> {
        self.rules.iter().filter(|r| r.is_active)
    }
}

/// Accrual rule sets for every known tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccrualConfig {
    tenants: BTreeMap<String, TenantConfig>,
}

impl AccrualConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tenant, replacing any previous rule set with the same id.
    pub fn insert(&mut self, tenant: TenantConfig) {
        self.tenants.insert(tenant.tenant_id.clone(), tenant);
    }

    /// Looks up a tenant.
    pub fn tenant(&self, tenant_id: &str) -> Option<&TenantConfig> {
        self.tenants.get(tenant_id)
    }

    /// Returns true if the tenant has a rule set.
    pub fn contains(&self, tenant_id: &str) -> bool {
        self.tenants.contains_key(tenant_id)
    }

    /// Iterates over tenants in id order.
    pub fn tenants(&self) -> impl Iterator<Item = &TenantConfig> {
        self.tenants.values()
    }

    /// Number of tenants.
    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    /// Returns true if no tenant is configured.
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}
