// src/checks/trusted_proxies.rs
use crate::bootstrap::ServiceContainer;
use crate::environment::{ExecutionEnvironment, HealthcheckEnvironment};
use crate::health::{Health, Healthcheck, Status};
use anyhow::Result;
use async_trait::async_trait;

/// Sanity check on the reverse proxy configuration. Only meaningful for a
/// web request, since only there a forwarded-header chain exists at all.
pub struct TrustedProxiesCheck {
    trusted_proxies: Vec<String>,
}

impl TrustedProxiesCheck {
    pub fn from_container(container: &ServiceContainer) -> Box<dyn Healthcheck> {
        Box::new(Self {
            trusted_proxies: container.settings.trusted_proxies.clone(),
        })
    }
}

#[async_trait]
impl Healthcheck for TrustedProxiesCheck {
    fn title(&self) -> &str {
        "Trusted proxies configuration"
    }

    async fn execute(&self, environment: &HealthcheckEnvironment) -> Result<Health> {
        let ExecutionEnvironment::Web { request_uri, .. } = &environment.execution_environment
        else {
            return Ok(Health::untitled(
                "Can only be checked from a web request.",
                Status::Unknown,
            ));
        };

        if self.trusted_proxies.is_empty() {
            // An https request URI implies TLS termination in front of the
            // application, so forwarded headers are in play.
            if request_uri.starts_with("https://") || environment.application_context.is_production()
            {
                return Ok(Health::untitled(
                    "The application seems to run behind a reverse proxy, but \
                     <code>trusted_proxies</code> is empty. Forwarded headers will be ignored.",
                    Status::Warning,
                ));
            }
            return Ok(Health::untitled(
                "No reverse proxy configured.",
                Status::Ok,
            ));
        }

        Ok(Health::untitled(
            format!(
                "Forwarded headers are accepted from {} configured proxy range(s).",
                self.trusted_proxies.len()
            ),
            Status::Ok,
        ))
    }
}
