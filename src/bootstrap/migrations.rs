// src/bootstrap/migrations.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub available: usize,
    pub executed: usize,
}

impl MigrationStatus {
    pub fn pending(&self) -> usize {
        self.available.saturating_sub(self.executed)
    }
}

/// Reports migration progress by comparing the migration scripts shipped
/// with the distribution against the executed-migrations record the host
/// application maintains under `Data/MigrationStatus.json`.
#[derive(Debug, Clone)]
pub struct MigrationService {
    migrations_dir: PathBuf,
    state_file: PathBuf,
}

impl MigrationService {
    pub fn new(root: &Path) -> Self {
        Self {
            migrations_dir: root.join("Migrations"),
            state_file: root.join("Data").join("MigrationStatus.json"),
        }
    }

    pub async fn status(&self) -> Result<MigrationStatus> {
        let available = self.count_available().await?;
        let executed = self.read_executed().await?;
        debug!(available, executed, "resolved migration status");
        Ok(MigrationStatus {
            available,
            executed,
        })
    }

    async fn count_available(&self) -> Result<usize> {
        // A distribution without a Migrations directory simply has none.
        let mut dir = match tokio::fs::read_dir(&self.migrations_dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("could not list {}", self.migrations_dir.display())
                })
            }
        };

        let mut count = 0;
        while let Some(dir_entry) = dir.next_entry().await? {
            if dir_entry.file_type().await?.is_file() {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn read_executed(&self) -> Result<usize> {
        let contents = match tokio::fs::read_to_string(&self.state_file).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("could not read {}", self.state_file.display()))
            }
        };

        let executed: Vec<String> = serde_json::from_str(&contents).with_context(|| {
            format!("{} is not a valid migration record", self.state_file.display())
        })?;
        Ok(executed.len())
    }
}
