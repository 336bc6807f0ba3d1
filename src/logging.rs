//! Structured logging setup.
//!
//! Configured from the environment:
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `MOCKSRV_LOG_LEVEL` | `trace`, `debug`, `info`, `warn`, `error` | `info` |
//! | `MOCKSRV_LOG_FORMAT` | `json`, `pretty` | `json` |
//! | `MOCKSRV_LOG_ASYNC` | `true`, `false` | `true` |
//! | `MOCKSRV_LOG_TARGET_FILTER` | comma-separated `EnvFilter` directives | none |
//! | `MOCKSRV_LOG_INCLUDE_LOCATION` | `true`, `false` | `false` |
//!
//! `RUST_LOG`, when set, replaces the level-derived filter.

use anyhow::{Context, Result};
use std::env;
use std::io;
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Write through a background thread via `tracing-appender`
    pub async_logging: bool,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };
        Self {
            log_level: lookup("MOCKSRV_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: LogFormat::parse(
                &lookup("MOCKSRV_LOG_FORMAT").unwrap_or_else(|| "json".to_string()),
            ),
            async_logging: flag("MOCKSRV_LOG_ASYNC", true),
            target_filter: lookup("MOCKSRV_LOG_TARGET_FILTER"),
            include_location: flag("MOCKSRV_LOG_INCLUDE_LOCATION", false),
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    let mut env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    // Connection resets from clients are logged by the transport at debug/info.
    env_filter = env_filter.add_directive(
        "may_minihttp=warn"
            .parse::<Directive>()
            .context("Invalid built-in log directive")?,
    );

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            match filter.parse::<Directive>() {
                Ok(directive) => env_filter = env_filter.add_directive(directive),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
            }
        }
    }
    Ok(env_filter)
}

/// Writer for the fmt layer. The async variant comes with the guard that
/// flushes its background thread when dropped.
fn writer<W>(async_logging: bool, out: W) -> (BoxMakeWriter, Option<WorkerGuard>)
where
    W: io::Write + Send + 'static,
{
    if async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(out);
        (BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (BoxMakeWriter::new(Mutex::new(out)), None)
    }
}

/// Install the global subscriber.
///
/// With async logging the returned guard must be held until the process is
/// about to exit; dropping it flushes buffered lines.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use mocksrv::logging::{init_logging_with_config, LogConfig};
///
/// let _guard = init_logging_with_config(&LogConfig::from_env()).expect("Failed to initialize logging");
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry().with(build_filter(config)?);
    let (make_writer, guard) = writer(config.async_logging, io::stdout());

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(make_writer)
            .boxed(),
    };

    registry
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
