use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Port used when none is given.
pub const DEFAULT_PORT: u16 = 8080;

/// How long a graceful shutdown waits for in-flight requests.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for one server instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Compose the access-log middleware in front of every handler
    pub access_log: bool,
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Listen on all interfaces at `port`.
    #[must_use]
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            access_log: true,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}
