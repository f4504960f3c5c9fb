//! Global tracing subscriber: stderr plus an optional JSON file sink.

use eyre::{Result, WrapErr};
use linesim_config::Logging;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG` wins, then `--log-level`, then `[logging] level`, then "info".
fn filter(cli_level: Option<&str>, cfg: &Logging) -> Result<EnvFilter> {
    if let Ok(f) = EnvFilter::try_from_default_env() {
        return Ok(f);
    }
    let level = cli_level.or(cfg.level.as_deref()).unwrap_or("info");
    EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level '{level}'"))
}

/// Install the subscriber. Keep the returned guard alive until exit so the
/// file sink gets flushed.
pub fn init_tracing(
    json: bool,
    cli_level: Option<&str>,
    cfg: &Logging,
) -> Result<Option<WorkerGuard>> {
    let mut guard = None;
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    layers.push(if json {
        stderr.json().boxed()
    } else {
        stderr.boxed()
    });

    if let Some(file) = cfg.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file '{file}' has no file name"))?;
        let appender = match cfg.rotation.as_deref().unwrap_or("never") {
            "daily" => tracing_appender::rolling::daily(dir, name),
            "hourly" => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, g) = tracing_appender::non_blocking(appender);
        guard = Some(g);
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter(cli_level, cfg)?)
        .try_init()
        .wrap_err("tracing already initialised")?;
    Ok(guard)
}
