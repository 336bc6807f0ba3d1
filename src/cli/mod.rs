//! # CLI Module
//!
//! Command-line interface of the `mocksrv` binary.
//!
//! ## Options
//!
//! - `--port <PORT>` - TCP port to listen on, all interfaces (default: 8080,
//!   env `MOCKSRV_PORT`)
//! - `--logger <BOOL>` - log every routed request (default: `true`)
//! - `--shutdown-timeout <DURATION>` - how long a graceful shutdown waits for
//!   in-flight requests, e.g. `5s` or `1500ms` (default: `5s`)
//!
//! ## Examples
//!
//! ```bash
//! mocksrv --port 9000
//! mocksrv --logger false
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli};
