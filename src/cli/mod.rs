// src/cli/mod.rs
use crate::bootstrap::Bootstrap;
use crate::environment::{resolve_invocation_hint, ExecutionEnvironment, HealthcheckEnvironment};
use crate::health::{CheckRegistry, Health, HealthChecker, HealthCollection, Status};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;
use tracing::debug;

const LOGO: &str = r#"
   ____       _
  / ___|  ___| |_ _   _ _ __
  \___ \ / _ \ __| | | | '_ \
   ___) |  __/ |_| |_| | |_) |
  |____/ \___|\__|\__,_| .__/
                       |_|
"#;

/// The `setup` command: compile-time checks in-process, runtime checks via
/// a fresh subprocess so they see a fully booted application, both rendered
/// to one colorized report. Returns the intended process exit code.
pub async fn run_setup(
    bootstrap: &Bootstrap,
    registry: &CheckRegistry,
    config_path: &Path,
) -> Result<i32> {
    println!("{}", LOGO.cyan());

    let environment = HealthcheckEnvironment::new(bootstrap.context, ExecutionEnvironment::cli());
    let checker = HealthChecker::new(registry, bootstrap, environment);
    let compiletime = checker
        .execute(&bootstrap.settings.healthchecks.compiletime)
        .await
        .context("invalid compile-time health check configuration")?;
    print_health_collection(&compiletime);

    let mut has_error = compiletime.has_error();
    if !has_error {
        match run_runtime_subprocess(config_path).await {
            Ok(runtime) => {
                has_error = runtime.has_error();
                print_health_collection(&runtime);
            }
            Err(err) => {
                // Subprocess trouble is indistinguishable from a broken
                // application for the operator, so render it like one.
                print_health_collection(&HealthCollection::empty().append(Health::new(
                    "Application runtime",
                    format!("The runtime health checks did not respond as expected. {err:#}"),
                    Status::Error,
                )));
                has_error = true;
            }
        }
    }

    if has_error {
        println!("{}", "Setup is not complete.".red());
        println!();
    }
    println!(
        "{}",
        render_message(&format!(
            "You can rerun this command anytime via <code>{} setup</code>",
            resolve_invocation_hint(cfg!(windows))
        ))
    );

    Ok(i32::from(has_error))
}

/// The hidden `runtime-json` command the setup subprocess runs: boots the
/// service container, evaluates the runtime checks with a CLI environment
/// and writes the JSON document to stdout. Logs go to stderr, keeping
/// stdout parseable.
pub async fn run_runtime_json(bootstrap: &Bootstrap, registry: &CheckRegistry) -> Result<i32> {
    let container = bootstrap.boot().await?;
    let environment = HealthcheckEnvironment::new(bootstrap.context, ExecutionEnvironment::cli());
    let checker =
        HealthChecker::new(registry, bootstrap, environment).with_container(&container);

    let collection = checker
        .execute(&bootstrap.settings.healthchecks.runtime)
        .await
        .context("invalid runtime health check configuration")?;

    println!("{}", collection.to_json()?);
    Ok(0)
}

async fn run_runtime_subprocess(config_path: &Path) -> Result<HealthCollection> {
    let exe = std::env::current_exe().context("could not locate the setup binary")?;
    debug!(exe = %exe.display(), "spawning runtime health check subprocess");

    let output = tokio::process::Command::new(exe)
        .arg("runtime-json")
        .arg(config_path)
        .output()
        .await
        .context("failed to spawn the runtime health check subprocess")?;

    if !output.status.success() {
        bail!(
            "the runtime subprocess exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    HealthCollection::from_json_str(stdout.trim()).with_context(|| {
        format!(
            "expected the runtime subprocess to return valid JSON, got: `{}`",
            stdout.trim()
        )
    })
}

/// Renders one collection the way the dashboard does, with terminal styles
/// instead of status badges.
pub fn print_health_collection(collection: &HealthCollection) {
    for health in collection {
        let title = match health.status {
            Status::Ok => health.title.green().to_string(),
            Status::Error => health.title.red().to_string(),
            Status::Warning => health.title.yellow().to_string(),
            Status::NotRun => format!("{} (not run)", health.title.bold()),
            Status::Unknown => health.title.bold().to_string(),
        };
        println!("{title}");

        if health.status == Status::NotRun {
            println!();
            continue;
        }

        println!("{}", render_message(&health.message));
        println!();
    }
}

/// Replaces `<code>…</code>` spans with an inverse-video style. Unbalanced
/// markup passes through untouched rather than being swallowed.
fn render_message(message: &str) -> String {
    let mut rendered = String::with_capacity(message.len());
    let mut rest = message;

    while let Some(open) = rest.find("<code>") {
        let after_open = &rest[open + "<code>".len()..];
        let Some(close) = after_open.find("</code>") else {
            break;
        };
        rendered.push_str(&rest[..open]);
        rendered.push_str(&after_open[..close].reversed().to_string());
        rest = &after_open[close + "</code>".len()..];
    }
    rendered.push_str(rest);
    rendered
}
