// src/health/checker.rs
use crate::bootstrap::{Bootstrap, ServiceContainer};
use crate::config::CheckConfig;
use crate::environment::{resolve_invocation_hint, HealthcheckEnvironment};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use super::{CheckFactory, CheckRegistry, Health, HealthCollection, Healthcheck, Status};

/// Configuration and contract errors. These abort the whole pass and are
/// never represented as a Health entry.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("no health check is registered for identifier `{identifier}`")]
    UnknownCheck { identifier: String },

    #[error(
        "health check `{identifier}` is deferred and needs a booted service container, \
         but this phase runs before services exist"
    )]
    ContainerRequired { identifier: String },
}

/// Runs the configured checks of one phase sequentially and aggregates
/// their outcomes.
///
/// Construction mirrors the two check lifecycles: every checker carries the
/// bootstrap handle; `with_container` additionally enables deferred checks
/// once the service container has been booted.
pub struct HealthChecker<'a> {
    registry: &'a CheckRegistry,
    bootstrap: &'a Bootstrap,
    container: Option<&'a ServiceContainer>,
    environment: HealthcheckEnvironment,
}

impl<'a> HealthChecker<'a> {
    pub fn new(
        registry: &'a CheckRegistry,
        bootstrap: &'a Bootstrap,
        environment: HealthcheckEnvironment,
    ) -> Self {
        Self {
            registry,
            bootstrap,
            container: None,
            environment,
        }
    }

    pub fn with_container(mut self, container: &'a ServiceContainer) -> Self {
        self.container = Some(container);
        self
    }

    /// Evaluates the configured checks in ascending `position` order.
    ///
    /// Checks run strictly one after another: once any entry carries an
    /// ERROR, the remaining checks are recorded as NOT_RUN without being
    /// executed, since later checks may depend on earlier ones succeeding.
    /// A check returning `Err` is recovered into an ERROR entry; only
    /// configuration problems abort the pass.
    pub async fn execute(
        &self,
        configured: &[CheckConfig],
    ) -> Result<HealthCollection, CheckerError> {
        let mut sorted: Vec<&CheckConfig> = configured.iter().collect();
        // Stable sort: ties on position keep declaration order, which
        // matters for the short-circuit once an error occurred.
        sorted.sort_by_key(|config| config.position);

        let mut collection = HealthCollection::empty();
        for config in sorted {
            let Some(identifier) = config.check.as_deref().filter(|c| !c.is_empty()) else {
                debug!(entry = %config.identifier, "skipping entry without check reference");
                continue;
            };

            let factory =
                self.registry
                    .get(identifier)
                    .ok_or_else(|| CheckerError::UnknownCheck {
                        identifier: identifier.to_string(),
                    })?;
            let check = self.instantiate(identifier, factory)?;

            let health = if collection.has_error() {
                Health::not_run()
            } else {
                match check.execute(&self.environment).await {
                    Ok(health) => health,
                    Err(failure) => self.recover(identifier, failure),
                }
            };

            let health = health
                .with_title_if_unset(check.title())
                .with_resolved_command_placeholder(resolve_invocation_hint(
                    self.environment.is_windows(),
                ));
            collection = collection.append(health);
        }

        Ok(collection)
    }

    fn instantiate(
        &self,
        identifier: &str,
        factory: &CheckFactory,
    ) -> Result<Box<dyn Healthcheck>, CheckerError> {
        match factory {
            CheckFactory::EarlyBoot(build) => Ok(build(self.bootstrap)),
            CheckFactory::Deferred(build) => match self.container {
                Some(container) => Ok(build(container)),
                None => Err(CheckerError::ContainerRequired {
                    identifier: identifier.to_string(),
                }),
            },
        }
    }

    /// Converts an unexpected check failure into an ERROR entry. The raw
    /// error chain only ever reaches the output in environments that are
    /// safe to leak technical details into; elsewhere the operator gets a
    /// generic message plus the log reference code.
    fn recover(&self, identifier: &str, failure: anyhow::Error) -> Health {
        let reference = Uuid::new_v4();
        let chain = format!("{failure:#}");
        error!(
            check = identifier,
            %reference,
            error = %chain,
            "health check failed unexpectedly"
        );

        let message = if self.environment.is_safe_to_leak_technical_details() {
            format!("The check failed unexpectedly: {failure:#}")
        } else {
            format!(
                "The check failed unexpectedly. Please consult the server log, \
                 reference <code>{reference}</code>."
            )
        };
        Health::untitled(message, Status::Error)
    }
}
