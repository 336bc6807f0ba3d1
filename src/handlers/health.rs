use tracing::info;

use super::AppState;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// `GET /healthcheck`
pub fn healthcheck(state: &AppState, _req: &HandlerRequest) -> HandlerResponse {
    if state.health.is_healthy() {
        HandlerResponse::text(200, "Server is healthy")
    } else {
        HandlerResponse::text(500, "Server is not healthy")
    }
}

/// `POST /healthcheck/fail`
pub fn healthcheck_fail(state: &AppState, req: &HandlerRequest) -> HandlerResponse {
    state.health.set_healthy(false);
    info!(request_id = %req.request_id, healthy = false, "Health flag changed");
    HandlerResponse::text(200, "Server will be not healthy")
}

/// `POST /healthcheck/ok`
pub fn healthcheck_ok(state: &AppState, req: &HandlerRequest) -> HandlerResponse {
    state.health.set_healthy(true);
    info!(request_id = %req.request_id, healthy = true, "Health flag changed");
    HandlerResponse::text(200, "Server will be healthy")
}
