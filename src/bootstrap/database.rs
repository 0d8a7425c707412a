// src/bootstrap/database.rs
use crate::config::DatabaseSettings;
use anyhow::{bail, Context, Result};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Thin reachability probe around the configured database backend. The
/// actual driver lives in the host application; for setup purposes only
/// "are the settings present and does the endpoint accept connections"
/// matters.
#[derive(Debug, Clone)]
pub struct DatabaseConnectionService {
    settings: Option<DatabaseSettings>,
}

impl DatabaseConnectionService {
    pub fn new(settings: Option<DatabaseSettings>) -> Self {
        Self { settings }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_some()
    }

    pub fn settings(&self) -> Option<&DatabaseSettings> {
        self.settings.as_ref()
    }

    /// Attempts a TCP connection to the configured host/port with a bounded
    /// timeout, so a dead database cannot hang the whole evaluation pass.
    pub async fn verify_connection(&self) -> Result<()> {
        let Some(settings) = &self.settings else {
            bail!("no database backend is configured");
        };

        let addr = format!("{}:{}", settings.host, settings.port);
        debug!(%addr, "probing database reachability");

        match timeout(
            Duration::from_secs(settings.connect_timeout_secs),
            TcpStream::connect(&addr),
        )
        .await
        {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(err)) => {
                Err(err).with_context(|| format!("could not reach the database at {addr}"))
            }
            Err(_) => bail!(
                "connection attempt to {addr} timed out after {}s",
                settings.connect_timeout_secs
            ),
        }
    }
}
