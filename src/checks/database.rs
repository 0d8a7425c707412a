// src/checks/database.rs
use crate::bootstrap::{Bootstrap, DatabaseConnectionService};
use crate::environment::HealthcheckEnvironment;
use crate::health::{Health, Healthcheck, Status};
use anyhow::Result;
use async_trait::async_trait;

/// Confirms database settings exist and the backend accepts connections.
/// Early-boot so the dashboard can point at a missing database before
/// anything depending on one is initialized.
pub struct DatabaseConnectionCheck {
    database: DatabaseConnectionService,
}

impl DatabaseConnectionCheck {
    pub fn from_bootstrap(bootstrap: &Bootstrap) -> Box<dyn Healthcheck> {
        Box::new(Self {
            database: DatabaseConnectionService::new(bootstrap.settings.database.clone()),
        })
    }
}

#[async_trait]
impl Healthcheck for DatabaseConnectionCheck {
    fn title(&self) -> &str {
        "Database"
    }

    async fn execute(&self, environment: &HealthcheckEnvironment) -> Result<Health> {
        if !self.database.is_configured() {
            return Ok(Health::untitled(
                "No database backend is configured. Please add a <code>database</code> \
                 section to your settings.",
                Status::Error,
            ));
        }

        match self.database.verify_connection().await {
            Ok(()) => Ok(Health::untitled("Connection up.", Status::Ok)),
            Err(err) => {
                let mut message = String::from(
                    "Please check the <code>database</code> section of your settings.",
                );
                if environment.is_safe_to_leak_technical_details() {
                    message = format!("{err:#}. {message}");
                }
                Ok(Health::untitled(message, Status::Error))
            }
        }
    }
}
