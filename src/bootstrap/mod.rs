// src/bootstrap/mod.rs
mod database;
mod migrations;

pub use database::DatabaseConnectionService;
pub use migrations::{MigrationService, MigrationStatus};

use crate::config::Settings;
use crate::environment::ApplicationContext;
use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

/// Low-level handle available before any services exist. Early-boot checks
/// are constructed from this directly; everything heavier waits for `boot`.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub context: ApplicationContext,
    pub root: PathBuf,
    pub settings: Settings,
}

impl Bootstrap {
    pub fn new(root: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            context: settings.context,
            root: root.into(),
            settings,
        }
    }

    /// Initializes the fully booted service container deferred checks are
    /// resolved from.
    pub async fn boot(&self) -> Result<ServiceContainer> {
        debug!(root = %self.root.display(), "booting service container");
        Ok(ServiceContainer {
            settings: self.settings.clone(),
            database: DatabaseConnectionService::new(self.settings.database.clone()),
            migrations: MigrationService::new(&self.root),
        })
    }
}

/// Services that only exist after full boot.
#[derive(Debug, Clone)]
pub struct ServiceContainer {
    pub settings: Settings,
    pub database: DatabaseConnectionService,
    pub migrations: MigrationService,
}
