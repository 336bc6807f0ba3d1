use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser};

use crate::duration::parse_duration;
use crate::handlers::AppState;
use crate::server::{self, ServerConfig};

/// Command-line interface for the mock server.
#[derive(Debug, Parser)]
#[command(name = "mocksrv", version)]
#[command(about = "Mock HTTP server with controllable latency, health and payloads", long_about = None)]
pub struct Cli {
    /// Listener port
    #[arg(long, env = "MOCKSRV_PORT", default_value_t = server::config::DEFAULT_PORT)]
    pub port: u16,

    /// Enable the request log
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub logger: bool,

    /// Maximum time to wait for in-flight requests on shutdown
    #[arg(long, value_parser = parse_duration, default_value = "5s")]
    pub shutdown_timeout: Duration,
}

impl Cli {
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            access_log: self.logger,
            shutdown_timeout: self.shutdown_timeout,
            ..ServerConfig::with_port(self.port)
        }
    }
}

/// Start the server described by `cli` and block until it has shut down.
///
/// # Errors
///
/// Fails when the listener cannot be bound, signal handlers cannot be
/// installed or in-flight requests outlive the shutdown timeout.
pub fn run_cli(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.server_config();
    let state = AppState::default();
    let running = server::start(&config, &state)
        .with_context(|| format!("starting server on {}", config.bind_addr))?;
    server::run_until_signal(running).context("shutting down server")?;
    Ok(())
}
