// src/checks/mod.rs
mod basic_requirements;
mod database;
mod end_to_end;
mod migrations;
mod trusted_proxies;

pub use basic_requirements::BasicRequirementsCheck;
pub use database::DatabaseConnectionCheck;
pub use end_to_end::EndToEndCheck;
pub use migrations::MigrationStatusCheck;
pub use trusted_proxies::TrustedProxiesCheck;

use crate::health::CheckRegistry;

/// The registry all transports share, with every shipped check under the
/// identifier the default configuration refers to.
pub fn builtin_registry() -> CheckRegistry {
    let mut registry = CheckRegistry::new();
    registry.register_early_boot("basicRequirements", BasicRequirementsCheck::from_bootstrap);
    registry.register_early_boot("database", DatabaseConnectionCheck::from_bootstrap);
    registry.register_early_boot("endToEnd", EndToEndCheck::from_bootstrap);
    registry.register_deferred("migrations", MigrationStatusCheck::from_container);
    registry.register_deferred("trustedProxies", TrustedProxiesCheck::from_container);
    registry
}
