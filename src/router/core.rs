//! Router core module - hot path for request routing.

use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of path/query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 4;

/// Inline parameter storage. Names are shared with the route table, values
/// are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(Arc<str>),
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

/// A single entry of the routing table.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub method: Method,
    /// Pattern as declared, e.g. `/file/{name}`
    pub path_pattern: Arc<str>,
    pub handler_name: Arc<str>,
    segments: Vec<Segment>,
}

impl RouteMeta {
    #[must_use]
    pub fn new(method: Method, path_pattern: &str, handler_name: &str) -> Self {
        let segments = split_path(path_pattern)
            .map(|seg| match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Param(Arc::from(name)),
                None => Segment::Literal(seg.to_string()),
            })
            .collect();
        Self {
            method,
            path_pattern: Arc::from(path_pattern),
            handler_name: Arc::from(handler_name),
            segments,
        }
    }

    /// Match `path` against this pattern, ignoring the method.
    fn match_path(&self, path: &str) -> Option<ParamVec> {
        let mut params = ParamVec::new();
        let mut parts = split_path(path);
        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => params.push((Arc::clone(name), part.to_string())),
            }
        }
        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

/// Result of successfully matching a request to a route.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<RouteMeta>,
    /// Path parameters extracted from the URL (e.g. `{name}` -> `cat.jpg`)
    pub path_params: ParamVec,
    pub handler_name: String,
    /// Query string parameters (populated by the server)
    pub query_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name. Last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Outcome of routing one request.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    Matched(RouteMatch),
    /// The path is known but not under the requested method.
    MethodNotAllowed { allowed: Vec<Method> },
    NotFound,
}

/// Linear-scan router over a small, fixed routing table.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Arc<RouteMeta>>,
}

impl Router {
    #[must_use]
    pub fn new(routes: Vec<RouteMeta>) -> Self {
        let routes: Vec<Arc<RouteMeta>> = routes.into_iter().map(Arc::new).collect();
        let routes_summary: Vec<String> = routes
            .iter()
            .map(|r| format!("{} {} -> {}", r.method, r.path_pattern, r.handler_name))
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
        Self { routes }
    }

    /// Match a request. `path` must not include the query string.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> RouteOutcome {
        let mut allowed = Vec::new();
        for route in &self.routes {
            let Some(path_params) = route.match_path(path) else {
                continue;
            };
            if route.method == *method {
                debug!(
                    method = %method,
                    path = %path,
                    handler = %route.handler_name,
                    "Route matched"
                );
                return RouteOutcome::Matched(RouteMatch {
                    route: Arc::clone(route),
                    path_params,
                    handler_name: route.handler_name.to_string(),
                    query_params: ParamVec::new(),
                });
            }
            if !allowed.contains(&route.method) {
                allowed.push(route.method.clone());
            }
        }
        if allowed.is_empty() {
            debug!(method = %method, path = %path, "No route matched");
            RouteOutcome::NotFound
        } else {
            debug!(method = %method, path = %path, allowed = ?allowed, "Method not allowed");
            RouteOutcome::MethodNotAllowed { allowed }
        }
    }
}
