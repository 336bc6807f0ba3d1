use std::time::Duration;

use tracing::{debug, info};

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Logs every request before it reaches its handler.
///
/// Emits one `info` event per request with the remote address, method, URL,
/// host and user agent, and a `debug` event with status and latency once the
/// handler returns. Missing values are logged as `-`.
pub struct AccessLogMiddleware;

impl Middleware for AccessLogMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        info!(
            target: "mocksrv::access",
            request_id = %req.request_id,
            remote_addr = req.remote_addr().unwrap_or("-"),
            method = %req.method,
            url = %req.target,
            host = req.get_header("host").unwrap_or("-"),
            user_agent = req.get_header("user-agent").unwrap_or("-"),
            "request"
        );
        None
    }

    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        debug!(
            target: "mocksrv::access",
            request_id = %req.request_id,
            status = res.status,
            body_bytes = res.body.len(),
            latency_ms = latency.as_millis() as u64,
            "response"
        );
    }
}
