// src/config/models.rs
use crate::environment::ApplicationContext;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;

/// Top level settings of the distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub context: ApplicationContext,

    /// Address the dashboard server binds to.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Database backend options; absent until the operator configured them.
    #[serde(default)]
    pub database: Option<DatabaseSettings>,

    /// Reverse proxies the application trusts forwarded headers from.
    #[serde(default)]
    pub trusted_proxies: Vec<String>,

    #[serde(default)]
    pub healthchecks: HealthchecksSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            context: ApplicationContext::default(),
            listen: default_listen(),
            database: None,
            trusted_proxies: Vec::new(),
            healthchecks: HealthchecksSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<SocketAddr>().is_err() {
            bail!("listen address `{}` is not a valid socket address", self.listen);
        }
        self.healthchecks.validate()?;
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

/// The two phase-keyed check lists. Compile-time checks run before the
/// service container exists, runtime checks after full boot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthchecksSettings {
    #[serde(default)]
    pub compiletime: Vec<CheckConfig>,

    #[serde(default)]
    pub runtime: Vec<CheckConfig>,
}

impl HealthchecksSettings {
    fn validate(&self) -> Result<()> {
        for (phase, checks) in [("compiletime", &self.compiletime), ("runtime", &self.runtime)] {
            let mut seen = HashSet::new();
            for check in checks {
                if check.identifier.is_empty() {
                    bail!("a {phase} health check entry is missing its identifier");
                }
                if !seen.insert(check.identifier.as_str()) {
                    bail!(
                        "duplicate {phase} health check identifier `{}`",
                        check.identifier
                    );
                }
            }
        }
        Ok(())
    }
}

/// One configured check. `check` names a registry entry; leaving it unset
/// (or empty) disables the entry without removing it from the list, the
/// usual way distributions switch off an inherited default check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub identifier: String,

    #[serde(default)]
    pub check: Option<String>,

    /// Run order, ascending. Ties keep declaration order.
    #[serde(default)]
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,

    #[serde(default = "default_database_port")]
    pub port: u16,

    pub dbname: String,

    pub user: String,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_database_port() -> u16 {
    3306
}

fn default_connect_timeout_secs() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn check_entries_default_to_disabled_and_position_zero() {
        let check: CheckConfig = serde_yaml::from_str("identifier: db").unwrap();
        assert_eq!(check.identifier, "db");
        assert!(check.check.is_none());
        assert_eq!(check.position, 0);
    }

    #[test]
    fn missing_identifier_fails_validation() {
        let settings = Settings {
            healthchecks: HealthchecksSettings {
                compiletime: vec![CheckConfig {
                    identifier: String::new(),
                    check: Some("database".to_string()),
                    position: 0,
                }],
                runtime: Vec::new(),
            },
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
