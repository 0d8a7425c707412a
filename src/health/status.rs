// src/health/status.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single health check. Serialized as the bare string name;
/// anything else fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    Error,
    Warning,
    Unknown,
    NotRun,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Error => "ERROR",
            Status::Warning => "WARNING",
            Status::Unknown => "UNKNOWN",
            Status::NotRun => "NOT_RUN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
