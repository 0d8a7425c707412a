// src/health/mod.rs
mod checker;
mod collection;
mod model;
mod registry;
mod status;

pub use checker::{CheckerError, HealthChecker};
pub use collection::HealthCollection;
pub use model::Health;
pub use registry::{CheckFactory, CheckRegistry, DeferredFactory, EarlyBootFactory, Healthcheck};
pub use status::Status;
