// src/checks/end_to_end.rs
use crate::bootstrap::Bootstrap;
use crate::environment::HealthcheckEnvironment;
use crate::health::{Health, Healthcheck, Status};
use anyhow::Result;
use async_trait::async_trait;

/// Registered for the runtime phase; a successful outcome proves the full
/// boot, the runtime subprocess and the JSON pipe back to the CLI work.
pub struct EndToEndCheck;

impl EndToEndCheck {
    pub fn from_bootstrap(_bootstrap: &Bootstrap) -> Box<dyn Healthcheck> {
        Box::new(Self)
    }
}

#[async_trait]
impl Healthcheck for EndToEndCheck {
    fn title(&self) -> &str {
        "End to end"
    }

    async fn execute(&self, _environment: &HealthcheckEnvironment) -> Result<Health> {
        Ok(Health::untitled(
            "The application is up and running.",
            Status::Ok,
        ))
    }
}
