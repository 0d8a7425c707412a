// src/health/model.rs
use crate::environment::COMMAND_PLACEHOLDER;
use serde::{Deserialize, Serialize};

use super::Status;

/// One health check outcome. Immutable once constructed; the builder-style
/// methods return a new value instead of mutating.
///
/// Messages may embed `<code>…</code>` spans for the renderers and the
/// `{{setupCommand}}` placeholder, which the orchestrator resolves per OS
/// family before the entry reaches any transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub title: String,
    pub message: String,
    pub status: Status,
}

impl Health {
    pub fn new(title: impl Into<String>, message: impl Into<String>, status: Status) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            status,
        }
    }

    /// Outcome without a title. Checks usually leave the title to the
    /// orchestrator, which fills it in from `Healthcheck::title()`.
    pub fn untitled(message: impl Into<String>, status: Status) -> Self {
        Self::new("", message, status)
    }

    /// Placeholder entry for a check that was suppressed by an earlier error.
    pub fn not_run() -> Self {
        Self::new("", "", Status::NotRun)
    }

    pub(crate) fn with_title_if_unset(mut self, title: &str) -> Self {
        if self.title.is_empty() {
            self.title = title.to_string();
        }
        self
    }

    pub(crate) fn with_resolved_command_placeholder(mut self, invocation_hint: &str) -> Self {
        if self.message.contains(COMMAND_PLACEHOLDER) {
            self.message = self.message.replace(COMMAND_PLACEHOLDER, invocation_hint);
        }
        self
    }
}
