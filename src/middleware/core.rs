use std::time::Duration;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Hook run around every dispatched handler.
///
/// `before` may answer the request itself by returning a response, in which
/// case the handler is skipped. `after` runs for every request, including
/// short-circuited ones, with the handler latency.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}
