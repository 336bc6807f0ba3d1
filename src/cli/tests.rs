//! Unit tests for CLI parsing

use std::net::SocketAddr;
use std::time::Duration;

use crate::cli::Cli;
use clap::Parser;

#[test]
fn test_defaults() {
    let cli = Cli::try_parse_from(["mocksrv"]).unwrap();
    assert_eq!(cli.port, 8080);
    assert!(cli.logger);
    assert_eq!(cli.shutdown_timeout, Duration::from_secs(5));

    let config = cli.server_config();
    assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
    assert!(config.access_log);
}

#[test]
fn test_port_and_logger_flags() {
    let cli = Cli::try_parse_from(["mocksrv", "--port", "9000", "--logger", "false"]).unwrap();
    assert_eq!(cli.port, 9000);
    assert!(!cli.logger);
    let config = cli.server_config();
    assert_eq!(config.bind_addr.port(), 9000);
    assert!(!config.access_log);
}

#[test]
fn test_shutdown_timeout_uses_duration_syntax() {
    let cli = Cli::try_parse_from(["mocksrv", "--shutdown-timeout", "1500ms"]).unwrap();
    assert_eq!(cli.server_config().shutdown_timeout, Duration::from_millis(1500));
}

#[test]
fn test_invalid_values_rejected() {
    assert!(Cli::try_parse_from(["mocksrv", "--port", "70000"]).is_err());
    assert!(Cli::try_parse_from(["mocksrv", "--port", "abc"]).is_err());
    assert!(Cli::try_parse_from(["mocksrv", "--logger", "maybe"]).is_err());
    assert!(Cli::try_parse_from(["mocksrv", "--shutdown-timeout", "soon"]).is_err());
}
