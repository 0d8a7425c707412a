// src/checks/basic_requirements.rs
use crate::bootstrap::Bootstrap;
use crate::environment::HealthcheckEnvironment;
use crate::health::{Health, Healthcheck, Status};
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Folders the distribution must be able to write into.
const REQUIRED_WRITABLE: &[&str] = &["Configuration", "Data", "Logs"];

/// Verifies the filesystem layout the distribution needs: the required
/// folders exist (creating them when missing) and accept writes.
pub struct BasicRequirementsCheck {
    root: PathBuf,
}

impl BasicRequirementsCheck {
    pub fn from_bootstrap(bootstrap: &Bootstrap) -> Box<dyn Healthcheck> {
        Box::new(Self {
            root: bootstrap.root.clone(),
        })
    }
}

#[async_trait]
impl Healthcheck for BasicRequirementsCheck {
    fn title(&self) -> &str {
        "Basic system requirements"
    }

    async fn execute(&self, _environment: &HealthcheckEnvironment) -> Result<Health> {
        for folder in REQUIRED_WRITABLE {
            let path = self.root.join(folder);

            if !path.is_dir() && tokio::fs::create_dir_all(&path).await.is_err() {
                return Ok(Health::untitled(
                    format!(
                        "The folder <code>{folder}</code> does not exist and could not be \
                         created, but the distribution needs it."
                    ),
                    Status::Error,
                ));
            }

            // Probe actual writability; permission bits lie on some mounts.
            let probe = path.join(".writable-probe");
            match tokio::fs::write(&probe, b"probe").await {
                Ok(()) => {
                    let _ = tokio::fs::remove_file(&probe).await;
                }
                Err(_) => {
                    return Ok(Health::untitled(
                        format!("The folder <code>{folder}</code> is not writable but should be."),
                        Status::Error,
                    ));
                }
            }
        }

        Ok(Health::untitled(
            "All basic requirements are fulfilled.",
            Status::Ok,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::environment::{ApplicationContext, ExecutionEnvironment};

    fn environment() -> HealthcheckEnvironment {
        HealthcheckEnvironment::new(ApplicationContext::Development, ExecutionEnvironment::cli())
    }

    #[tokio::test]
    async fn creates_missing_folders_and_reports_ok() {
        let root = tempfile::tempdir().unwrap();
        let bootstrap = Bootstrap::new(root.path(), Settings::default());
        let check = BasicRequirementsCheck::from_bootstrap(&bootstrap);

        let health = check.execute(&environment()).await.unwrap();
        assert_eq!(health.status, Status::Ok);
        for folder in REQUIRED_WRITABLE {
            assert!(root.path().join(folder).is_dir());
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn read_only_folder_is_an_error_outcome() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("Data");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::set_permissions(&data, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores permission bits; nothing to observe then.
        if std::fs::write(data.join(".root-probe"), b"x").is_ok() {
            let _ = std::fs::remove_file(data.join(".root-probe"));
            return;
        }

        let bootstrap = Bootstrap::new(root.path(), Settings::default());
        let check = BasicRequirementsCheck::from_bootstrap(&bootstrap);

        let health = check.execute(&environment()).await.unwrap();
        // Restore permissions so the tempdir can be cleaned up.
        std::fs::set_permissions(&data, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(health.status, Status::Error);
        assert!(health.message.contains("<code>Data</code>"));
    }
}
