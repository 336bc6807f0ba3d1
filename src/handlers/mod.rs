//! Route handlers.
//!
//! Each handler is a plain function taking the shared [`AppState`] and the
//! dispatched [`HandlerRequest`](crate::dispatcher::HandlerRequest). The
//! [`registry`](crate::registry) wraps them into dispatcher closures.

pub mod file;
pub mod health;
pub mod root;
pub mod simple;

use std::sync::Arc;

use http::Method;

use crate::fake::{FieldSpec, SYNTHETIC_RECORD_SCHEMA};
use crate::health::HealthState;
use crate::router::RouteMeta;

pub use file::{ByteSource, OsByteSource};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub health: HealthState,
    /// Source of the bytes served by `/file/{name}`
    pub bytes: Arc<dyn ByteSource>,
    /// Schema used to build the payload of `GET /`
    pub schema: &'static [FieldSpec],
}

impl AppState {
    #[must_use]
    pub fn new(health: HealthState) -> Self {
        Self {
            health,
            bytes: Arc::new(OsByteSource),
            schema: SYNTHETIC_RECORD_SCHEMA,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(HealthState::new())
    }
}

/// The service's routing table as `(method, pattern, handler name)` entries.
#[must_use]
pub fn routes() -> Vec<RouteMeta> {
    vec![
        RouteMeta::new(Method::GET, "/", "root"),
        RouteMeta::new(Method::GET, "/file/{name}", "file"),
        RouteMeta::new(Method::GET, "/simple", "simple"),
        RouteMeta::new(Method::GET, "/healthcheck", "healthcheck"),
        RouteMeta::new(Method::POST, "/healthcheck/fail", "healthcheck_fail"),
        RouteMeta::new(Method::POST, "/healthcheck/ok", "healthcheck_ok"),
    ]
}
