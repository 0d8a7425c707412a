// src/checks/migrations.rs
use crate::bootstrap::{MigrationService, ServiceContainer};
use crate::environment::HealthcheckEnvironment;
use crate::health::{Health, Healthcheck, Status};
use anyhow::Result;
use async_trait::async_trait;

/// Deferred check on migration progress. Positioned after the database
/// check in the default configuration.
pub struct MigrationStatusCheck {
    migrations: MigrationService,
}

impl MigrationStatusCheck {
    pub fn from_container(container: &ServiceContainer) -> Box<dyn Healthcheck> {
        Box::new(Self {
            migrations: container.migrations.clone(),
        })
    }
}

#[async_trait]
impl Healthcheck for MigrationStatusCheck {
    fn title(&self) -> &str {
        "Migrations"
    }

    async fn execute(&self, _environment: &HealthcheckEnvironment) -> Result<Health> {
        // An unreadable or corrupt migration record propagates as an
        // unexpected failure; the orchestrator recovers it.
        let status = self.migrations.status().await?;

        if status.executed == 0 && status.available > 0 {
            return Ok(Health::untitled(
                "No migrations have been executed yet. Please run \
                 <code>{{setupCommand}} migrate</code>.",
                Status::Error,
            ));
        }

        if status.pending() > 0 {
            return Ok(Health::untitled(
                format!(
                    "{} migrations are pending. Please run \
                     <code>{{{{setupCommand}}}} migrate</code>.",
                    status.pending()
                ),
                Status::Warning,
            ));
        }

        Ok(Health::untitled(
            "All migrations have been executed.",
            Status::Ok,
        ))
    }
}
