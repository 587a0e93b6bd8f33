//! Tracing configuration
//!
//! ## Behavior / 行为
//!
//! - Console output goes to stderr so command output on stdout stays clean
//! - A non-blocking file writer appends to `<log_dir>/sportsfest.log`
//! - `RUST_LOG` overrides the configured directives

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Default filter directives when neither `RUST_LOG` nor the config sets one.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        "warn".to_string(),
        if is_dev { "sportsfest_lib=debug" } else { "sportsfest_lib=info" }.to_string(),
        if is_dev { "sf_app=debug" } else { "sf_app=info" }.to_string(),
        if is_dev { "sf_infra=debug" } else { "sf_infra=info" }.to_string(),
        "reqwest=warn".to_string(),
        "hyper=off".to_string(),
    ]
}

fn build_env_filter(configured: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    if !configured.trim().is_empty() {
        if let Ok(filter) = EnvFilter::try_new(configured) {
            return filter;
        }
        eprintln!("Invalid log level '{configured}', using defaults");
    }
    EnvFilter::new(build_filter_directives(cfg!(debug_assertions)).join(","))
}

/// Install the global subscriber. Call once, before any use case runs.
///
/// File logging failures fall back to console only.
pub fn init_tracing_subscriber(log_dir: &Path, log_level: &str) -> anyhow::Result<()> {
    let env_filter = build_env_filter(log_level);

    let console_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIME_FORMAT.to_string()))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(io::stderr);

    let file_writer = match build_file_writer(log_dir) {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stderr: {err}");
            None
        }
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIME_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn build_file_writer(log_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, "sportsfest.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
