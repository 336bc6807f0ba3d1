//! Dispatcher core module - hot path for request dispatch.

use crate::ids::RequestId;
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch};
use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Inline header storage. Names are lowercase.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data handed to a handler.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for log correlation
    pub request_id: RequestId,
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Request target as received, including the query string
    pub target: String,
    /// Name of the handler that should process this request
    pub handler_name: String,
    pub path_params: ParamVec,
    pub query_params: ParamVec,
    /// HTTP headers with lowercase names
    pub headers: HeaderVec,
}

impl HandlerRequest {
    /// Get a path parameter by name. Last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name. Last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Client address as reported by a fronting proxy.
    ///
    /// The transport does not expose the peer socket address, so this reads
    /// the first `X-Forwarded-For` entry, then `X-Real-IP`.
    #[must_use]
    pub fn remote_addr(&self) -> Option<&str> {
        self.get_header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| self.get_header("x-real-ip"))
    }
}

/// Body of a handler response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl ResponseBody {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ResponseBody::Json(v) => v.to_string().len(),
            ResponseBody::Text(s) => s.len(),
            ResponseBody::Bytes(b) => b.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct HandlerResponse {
    pub status: u16,
    pub headers: HeaderVec,
    pub body: ResponseBody,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: ResponseBody) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response with `Content-Type: application/json`
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self::new(status, headers, ResponseBody::Json(body))
    }

    /// Plain text response with `Content-Type: text/plain; charset=utf-8`
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((
            Arc::from("content-type"),
            "text/plain; charset=utf-8".to_string(),
        ));
        Self::new(status, headers, ResponseBody::Text(body.into()))
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Shared handler function.
pub type HandlerFn = Arc<dyn Fn(&HandlerRequest) -> HandlerResponse + Send + Sync>;

/// Maps handler names to handler functions and runs the middleware chain.
#[derive(Clone, Default)]
pub struct Dispatcher {
    pub handlers: HashMap<String, HandlerFn>,
    /// Ordered list of middleware to apply to requests/responses
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler_fn` under `name`, replacing any previous handler.
    pub fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(&HandlerRequest) -> HandlerResponse + Send + Sync + 'static,
    {
        if self.handlers.contains_key(name) {
            warn!(handler_name = %name, "Replaced existing handler");
        }
        self.handlers.insert(name.to_string(), Arc::new(handler_fn));
        debug!(
            handler_name = %name,
            total_handlers = self.handlers.len(),
            "Handler registered"
        );
    }

    /// Middleware runs in the order it was added.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Run the handler for `route_match`.
    ///
    /// Returns `None` when no handler is registered under the route's name.
    #[must_use]
    pub fn dispatch(
        &self,
        route_match: RouteMatch,
        target: String,
        headers: HeaderVec,
        request_id: RequestId,
    ) -> Option<HandlerResponse> {
        let Some(handler) = self.handlers.get(&route_match.handler_name) else {
            let available_handlers: Vec<&String> = self.handlers.keys().collect();
            error!(
                request_id = %request_id,
                handler_name = %route_match.handler_name,
                available_handlers = ?available_handlers,
                "Handler not found"
            );
            return None;
        };

        let request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path: target.split('?').next().unwrap_or("/").to_string(),
            target,
            handler_name: route_match.handler_name,
            path_params: route_match.path_params,
            query_params: route_match.query_params,
            headers,
        };

        let mut early_resp = None;
        for mw in &self.middlewares {
            if let Some(resp) = mw.before(&request) {
                debug!(
                    request_id = %request_id,
                    middleware_name = std::any::type_name_of_val(mw.as_ref()),
                    "Middleware returned early response"
                );
                early_resp = Some(resp);
                break;
            }
        }

        let (mut resp, latency) = match early_resp {
            Some(r) => (r, Duration::ZERO),
            None => {
                let start = Instant::now();
                let resp = match catch_unwind(AssertUnwindSafe(|| handler(&request))) {
                    Ok(resp) => resp,
                    Err(panic) => {
                        let message = panic
                            .downcast_ref::<&str>()
                            .map(|s| (*s).to_string())
                            .or_else(|| panic.downcast_ref::<String>().cloned())
                            .unwrap_or_else(|| "unknown panic".to_string());
                        error!(
                            request_id = %request_id,
                            handler_name = %request.handler_name,
                            panic = %message,
                            "Handler panicked"
                        );
                        HandlerResponse::text(500, "Internal Server Error")
                    }
                };
                (resp, start.elapsed())
            }
        };

        for mw in &self.middlewares {
            mw.after(&request, &mut resp, latency);
        }

        debug!(
            request_id = %request_id,
            handler_name = %request.handler_name,
            status = resp.status,
            latency_ms = latency.as_millis() as u64,
            "Handler completed"
        );
        Some(resp)
    }
}
