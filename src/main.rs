// src/main.rs
use anyhow::{bail, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use setup_dashboard::{
    bootstrap::Bootstrap,
    checks, cli, config,
    server::{AppState, RequestHandler, SetupServer},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr: the `runtime-json` subprocess must keep stdout
    // clean for the JSON document the parent parses.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("setup_dashboard=info".parse()?)
                .add_directive("hyper=warn".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "setup".to_string());
    let config_path = args.next().unwrap_or_else(|| "config.yaml".to_string());

    let settings = config::load_config(&config_path).await?;
    let root = std::env::current_dir()?;
    let bootstrap = Bootstrap::new(root, settings);
    let registry = checks::builtin_registry();

    match command.as_str() {
        // `welcome` and `setup:setup:index` are historical aliases.
        "setup" | "welcome" | "setup:setup:index" => {
            let exit_code = cli::run_setup(&bootstrap, &registry, Path::new(&config_path)).await?;
            std::process::exit(exit_code);
        }
        "runtime-json" => {
            let exit_code = cli::run_runtime_json(&bootstrap, &registry).await?;
            std::process::exit(exit_code);
        }
        "serve" => {
            let addr: SocketAddr = bootstrap.settings.listen.parse()?;

            let container = bootstrap.boot().await?;
            let state = Arc::new(AppState {
                bootstrap,
                container,
                registry,
            });

            SetupServer::bind(addr, RequestHandler::new(state))
                .await?
                .serve()
                .await?;
        }
        other => bail!("unknown command `{other}` (expected `setup`, `serve` or `runtime-json`)"),
    }

    Ok(())
}
