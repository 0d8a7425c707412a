// src/server/server.rs
use crate::server::RequestHandler;
use anyhow::{Context, Result};
use hyper::server::conn::Http;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Dashboard HTTP server. Binding is separate from serving so callers can
/// pass port 0 and discover the chosen address.
pub struct SetupServer {
    listener: TcpListener,
    handler: RequestHandler,
}

impl SetupServer {
    pub async fn bind(addr: SocketAddr, handler: RequestHandler) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("could not bind {addr}"))?;
        Ok(Self { listener, handler })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept loop, one Tokio task per connection.
    pub async fn serve(self) -> Result<()> {
        info!(
            "setup dashboard listening on http://{}/setup",
            self.local_addr()?
        );

        loop {
            let (stream, peer) = self.listener.accept().await?;
            let svc = self.handler.clone();

            tokio::spawn(async move {
                if let Err(err) = Http::new().serve_connection(stream, svc).await {
                    warn!(%peer, %err, "connection error");
                }
            });
        }
    }
}
