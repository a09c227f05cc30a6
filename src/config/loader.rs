//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading server
//! settings and tenant accrual rules from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};
use crate::models::AccrualRule;

use super::types::{AccrualConfig, ServerSettings, TenantConfig, TenantRulesFile};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// data/demo/
/// ├── server.yaml          # Optional listener settings
/// └── tenants/
///     ├── acme.yaml        # One accrual rule set per tenant
///     └── globex.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./data/demo").unwrap();
/// println!("Listening on {}", loader.server().bind_address());
/// for tenant in loader.accrual().tenants() {
///     println!("{}: {} rule(s)", tenant.name(), tenant.rules().len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    server: ServerSettings,
    accrual: AccrualConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./data/demo")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The `tenants` directory is missing or holds no YAML files
    /// - Any file contains invalid YAML
    /// - Any tenant rule set fails validation
    /// - Two tenant files declare the same tenant id
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let server_path = path.join("server.yaml");
        let server = if server_path.exists() {
            load_yaml::<ServerSettings>(&server_path)?
        } else {
            ServerSettings::default()
        };

        let tenants_dir = path.join("tenants");
        let accrual = Self::load_tenants(&tenants_dir)?;

        Ok(Self {
            root: path.to_path_buf(),
            server,
            accrual,
        })
    }

    /// Loads all tenant files from the tenants directory.
    fn load_tenants(tenants_dir: &Path) -> EngineResult<AccrualConfig> {
        let tenants_dir_str = tenants_dir.display().to_string();

        if !tenants_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: tenants_dir_str,
            });
        }

        let entries = fs::read_dir(tenants_dir).map_err(|_| EngineError::ConfigNotFound {
            path: tenants_dir_str.clone(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: tenants_dir_str.clone(),
            })?;

            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tenant files found)", tenants_dir_str),
            });
        }

        // read_dir order is platform-dependent
        files.sort();

        let mut accrual = AccrualConfig::new();
        for path in files {
            let file = load_yaml::<TenantRulesFile>(&path)?;
            if accrual.contains(&file.tenant_id) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("tenant '{}' is declared more than once", file.tenant_id),
                });
            }
            accrual.insert(TenantConfig::from_file(file)?);
        }

        Ok(accrual)
    }

    /// The directory configuration was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerSettings {
        &self.server
    }

    /// Returns every tenant's accrual rules.
    pub fn accrual(&self) -> &AccrualConfig {
        &self.accrual
    }

    /// Consumes the loader, returning the accrual configuration.
    pub fn into_accrual(self) -> AccrualConfig {
        self.accrual
    }

    /// Gets the active accrual rules of a tenant.
    ///
    /// # Returns
    ///
    /// Returns the rules if the tenant is known, or `AccrualConfigMissing`.
    /// A known tenant with no active rules yields an empty list.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use leave_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./data/demo")?;
    /// let rules = loader.get_active_rules("acme")?;
    /// println!("acme has {} active rule(s)", rules.len());
    /// # Ok::<(), leave_engine::error::EngineError>(())
    /// ```
    pub fn get_active_rules(&self, tenant_id: &str) -> EngineResult<Vec<AccrualRule>> {
        self.accrual
            .tenant(tenant_id)
            .map(|t| t.active_rules().cloned().collect())
            .ok_or_else(|| EngineError::AccrualConfigMissing {
                tenant_id: tenant_id.to_string(),
            })
    }
}

/// Loads and parses a YAML file.
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}
