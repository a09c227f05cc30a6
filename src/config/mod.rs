//! Configuration loading and management for the Leave Engine.
//!
//! This module loads server settings and per-tenant accrual rules from
//! YAML files, validating every rule set as it is read.
//!
//! # Example
//!
//! ```no_run
//! use leave_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./data/demo").unwrap();
//! println!("Loaded {} tenant(s)", config.accrual().len());
//! ```

mod loader;
mod types;

pub(crate) use loader::load_yaml;
pub use loader::ConfigLoader;
pub use types::{AccrualConfig, AccrualRuleEntry, ServerSettings, TenantConfig, TenantRulesFile};
