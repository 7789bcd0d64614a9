//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the config file. Without it, this crate logs at
//! `log_level` while the HTTP and database stacks are held at `warn`.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;

/// Crates that are noisy at `info` and below
const QUIET_TARGETS: [&str; 4] = ["sqlx", "hyper", "tower", "axum::rejection"];

/// Filter used when `RUST_LOG` is unset.
fn default_directives(log_level: &str) -> String {
    let mut directives = vec![
        "warn".to_string(),
        format!("simplebank={log_level}"),
        // Per-transfer commit lines stay visible even when the rest is quiet.
        format!("simplebank::transfer={}", max_level(log_level, "info")),
    ];
    directives.extend(QUIET_TARGETS.iter().map(|t| format!("{t}=warn")));
    directives.join(",")
}

/// The more verbose of two level names.
fn max_level<'a>(a: &'a str, b: &'a str) -> &'a str {
    const ORDER: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    let rank = |l: &str| ORDER.iter().position(|o| o.eq_ignore_ascii_case(l));
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) if y > x => b,
        (Some(_), _) => a,
        _ => b,
    }
}

fn rotation(name: &str) -> Rotation {
    match name {
        "minutely" => Rotation::MINUTELY,
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        _ => Rotation::NEVER,
    }
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process or buffered file output is lost.
pub fn init_logging(config: &AppConfig) -> Result<WorkerGuard> {
    let file_appender = RollingFileAppender::builder()
        .rotation(rotation(&config.rotation))
        .filename_prefix(config.log_file.clone())
        .build(&config.log_dir)
        .with_context(|| format!("Failed to open log directory: {}", config.log_dir))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(&config.log_level))
            .with_context(|| format!("Invalid log_level: {}", config.log_level))?,
    };

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        // One object per line with span fields, for log shippers.
        let file_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry
            .with(file_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    } else {
        let file_layer = fmt::layer()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().compact().with_target(false).with_ansi(true);
        registry
            .with(file_layer)
            .with(stdout_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_scope_level_to_crate() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("warn,simplebank=debug,"));
        assert!(directives.contains("simplebank::transfer=debug"));
        assert!(directives.contains("sqlx=warn"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn test_transfer_logs_never_below_info() {
        assert!(default_directives("warn").contains("simplebank::transfer=info"));
        assert!(default_directives("error").contains("simplebank::transfer=info"));
        assert!(default_directives("trace").contains("simplebank::transfer=trace"));
    }

    #[test]
    fn test_max_level() {
        assert_eq!(max_level("warn", "info"), "info");
        assert_eq!(max_level("debug", "info"), "debug");
        assert_eq!(max_level("bogus", "info"), "info");
    }

    #[test]
    fn test_rotation_names() {
        assert_eq!(rotation("hourly"), Rotation::HOURLY);
        assert_eq!(rotation("daily"), Rotation::DAILY);
        assert_eq!(rotation("never"), Rotation::NEVER);
        assert_eq!(rotation("weekly"), Rotation::NEVER);
    }
}
