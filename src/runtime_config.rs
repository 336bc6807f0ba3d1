//! # Runtime Configuration Module
//!
//! Coroutine runtime settings loaded from the environment.
//!
//! ## `MOCKSRV_STACK_SIZE`
//!
//! Stack size of every coroutine, including the ones serving connections.
//! Accepts decimal (`32768`) or hexadecimal (`0x8000`). Default: `0x8000`
//! (32 KB). Invalid values fall back to the default.
//!
//! ```rust
//! use mocksrv::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! assert!(config.stack_size > 0);
//! ```

use std::env;

use tracing::info;

/// Default coroutine stack size in bytes.
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    let parsed = match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    };
    parsed.filter(|n| *n > 0)
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = env::var("MOCKSRV_STACK_SIZE")
            .ok()
            .and_then(|v| parse_size(&v))
            .unwrap_or(DEFAULT_STACK_SIZE);
        RuntimeConfig { stack_size }
    }

    /// Configure the global `may` scheduler. Call before starting the server.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
        info!(stack_size = self.stack_size, "Coroutine runtime configured");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_formats() {
        assert_eq!(parse_size("32768"), Some(32768));
        assert_eq!(parse_size("0x4000"), Some(0x4000));
        assert_eq!(parse_size("0X10000"), Some(0x10000));
        assert_eq!(parse_size(" 4096 "), Some(4096));
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert_eq!(parse_size("big"), None);
        assert_eq!(parse_size("0xZZ"), None);
        assert_eq!(parse_size("0"), None);
    }
}
