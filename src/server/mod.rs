//! HTTP transport: request parsing, response writing, the `may_minihttp`
//! service and the server lifecycle.

pub mod config;
pub mod http_server;
pub mod lifecycle;
pub mod request;
pub mod response;
pub mod service;

pub use config::ServerConfig;
pub use http_server::{HttpServer, ServerHandle};
pub use lifecycle::{
    run_until_signal, start, InFlight, InFlightGuard, LifecycleError, RunningServer,
};
pub use request::{parse_query_params, parse_request, parse_target, ParsedRequest};
pub use service::AppService;

#[cfg(unix)]
pub use lifecycle::wait_for_signal;
