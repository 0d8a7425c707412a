// src/health/registry.rs
use crate::bootstrap::{Bootstrap, ServiceContainer};
use crate::environment::HealthcheckEnvironment;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use super::Health;

/// Contract every registrable health check implements.
///
/// `execute` returns `Ok(Health)` for any outcome the check itself can
/// classify, including its own failures. An `Err` signals something the
/// check did not anticipate; the orchestrator recovers it into an ERROR
/// entry without aborting the pass.
#[async_trait]
pub trait Healthcheck: Send + Sync {
    fn title(&self) -> &str;

    async fn execute(&self, environment: &HealthcheckEnvironment) -> Result<Health>;
}

pub type EarlyBootFactory = fn(&Bootstrap) -> Box<dyn Healthcheck>;
pub type DeferredFactory = fn(&ServiceContainer) -> Box<dyn Healthcheck>;

/// The two check lifecycles. Early-boot checks are built straight from the
/// bootstrap handle before any services exist; deferred checks need the
/// fully booted service container.
pub enum CheckFactory {
    EarlyBoot(EarlyBootFactory),
    Deferred(DeferredFactory),
}

/// Typed mapping from configured check identifiers to constructors.
///
/// Replaces class-name-string instantiation: the capability contract is
/// enforced at registration time by the factory signatures, so a config
/// entry can only fail by naming an identifier that was never registered.
#[derive(Default)]
pub struct CheckRegistry {
    factories: HashMap<String, CheckFactory>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_early_boot(&mut self, identifier: impl Into<String>, factory: EarlyBootFactory) {
        self.factories
            .insert(identifier.into(), CheckFactory::EarlyBoot(factory));
    }

    pub fn register_deferred(&mut self, identifier: impl Into<String>, factory: DeferredFactory) {
        self.factories
            .insert(identifier.into(), CheckFactory::Deferred(factory));
    }

    pub fn get(&self, identifier: &str) -> Option<&CheckFactory> {
        self.factories.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }
}
