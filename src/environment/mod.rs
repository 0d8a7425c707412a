// src/environment/mod.rs
use serde::{Deserialize, Serialize};

/// Application context the distribution runs in. Influences only how much
/// technical detail check output may expose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationContext {
    #[default]
    Development,
    Production,
    Testing,
}

impl ApplicationContext {
    pub fn is_production(&self) -> bool {
        matches!(self, ApplicationContext::Production)
    }
}

/// Where the current evaluation pass was triggered from. Passed in
/// explicitly instead of probing ambient process state so transports and
/// tests control it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEnvironment {
    Cli { is_windows: bool },
    Web { request_uri: String, is_windows: bool },
}

impl ExecutionEnvironment {
    /// CLI environment for the OS this binary was compiled for.
    pub fn cli() -> Self {
        ExecutionEnvironment::Cli {
            is_windows: cfg!(windows),
        }
    }

    pub fn web(request_uri: impl Into<String>) -> Self {
        ExecutionEnvironment::Web {
            request_uri: request_uri.into(),
            is_windows: cfg!(windows),
        }
    }

    pub fn is_cli(&self) -> bool {
        matches!(self, ExecutionEnvironment::Cli { .. })
    }

    pub fn is_windows(&self) -> bool {
        match self {
            ExecutionEnvironment::Cli { is_windows } => *is_windows,
            ExecutionEnvironment::Web { is_windows, .. } => *is_windows,
        }
    }
}

/// Read-only context shared by all checks of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthcheckEnvironment {
    pub application_context: ApplicationContext,
    pub execution_environment: ExecutionEnvironment,
}

impl HealthcheckEnvironment {
    pub fn new(
        application_context: ApplicationContext,
        execution_environment: ExecutionEnvironment,
    ) -> Self {
        Self {
            application_context,
            execution_environment,
        }
    }

    /// Whether check output may contain stack traces, paths and raw error
    /// messages. True for the CLI and for non-production contexts; in a
    /// production web context messages must stay generic.
    pub fn is_safe_to_leak_technical_details(&self) -> bool {
        self.execution_environment.is_cli() || !self.application_context.is_production()
    }

    pub fn is_windows(&self) -> bool {
        self.execution_environment.is_windows()
    }
}

/// Token checks may embed in messages to refer to this distribution's
/// command line entry point without knowing the OS they will be rendered on.
pub const COMMAND_PLACEHOLDER: &str = "{{setupCommand}}";

/// How to invoke the setup binary on the given OS family.
pub fn resolve_invocation_hint(is_windows: bool) -> &'static str {
    if is_windows {
        r".\setup.bat"
    } else {
        "./setup"
    }
}
