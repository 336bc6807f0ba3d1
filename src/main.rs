use anyhow::Context;
use clap::Parser;
use mocksrv::cli::{run_cli, Cli};
use mocksrv::logging::{init_logging_with_config, LogConfig};
use mocksrv::runtime_config::RuntimeConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Held until main returns so the background writer flushes the last lines.
    let _log_guard =
        init_logging_with_config(&LogConfig::from_env()).context("initializing logging")?;
    RuntimeConfig::from_env().apply();

    if let Err(err) = run_cli(&cli) {
        tracing::error!(error = %format_args!("{err:#}"), "server failed");
        return Err(err);
    }
    Ok(())
}
