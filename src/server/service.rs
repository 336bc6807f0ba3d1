use std::io;
use std::sync::Arc;

use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use tracing::{error, warn};

use super::lifecycle::InFlight;
use super::request::{parse_request, ParsedRequest};
use super::response::{write_handler_response, write_json_error, ConnectionLines};
use crate::dispatcher::{Dispatcher, HandlerResponse};
use crate::ids::RequestId;
use crate::router::{RouteOutcome, Router};

/// The `may_minihttp` service: routes, dispatches and writes responses.
///
/// Cloned once per connection; all clones share the router, the dispatcher
/// and the in-flight counter. Header lines that could not be interned belong
/// to the clone and live until its next request.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
    pub in_flight: InFlight,
    lines: ConnectionLines,
}

impl AppService {
    #[must_use]
    pub fn new(router: Router, dispatcher: Dispatcher) -> Self {
        Self {
            router: Arc::new(router),
            dispatcher: Arc::new(dispatcher),
            in_flight: InFlight::default(),
            lines: ConnectionLines::default(),
        }
    }

    fn handle(&mut self, parsed: ParsedRequest, res: &mut Response) {
        let http_method = parsed.http_method();
        let ParsedRequest {
            method,
            path,
            target,
            headers,
            query_params,
        } = parsed;

        let Some(http_method) = http_method else {
            write_json_error(
                res,
                400,
                json!({ "error": "Bad Request", "method": method, "path": path }),
                &mut self.lines,
            );
            return;
        };

        match self.router.route(&http_method, &path) {
            RouteOutcome::Matched(mut route_match) => {
                route_match.query_params = query_params;
                let request_id = RequestId::from_header_or_new(
                    headers
                        .iter()
                        .find(|(k, _)| k.as_ref() == "x-request-id")
                        .map(|(_, v)| v.as_str()),
                );
                match self
                    .dispatcher
                    .dispatch(route_match, target, headers, request_id)
                {
                    Some(hr) => write_handler_response(res, hr, &mut self.lines),
                    None => {
                        error!(request_id = %request_id, method = %method, path = %path, "No handler for route");
                        write_json_error(
                            res,
                            500,
                            json!({
                                "error": "Handler failed or not registered",
                                "method": method,
                                "path": path
                            }),
                            &mut self.lines,
                        );
                    }
                }
            }
            RouteOutcome::MethodNotAllowed { allowed } => {
                let allow = allowed
                    .iter()
                    .map(http::Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut hr = HandlerResponse::json(
                    405,
                    json!({ "error": "Method Not Allowed", "method": method, "path": path }),
                );
                hr.set_header("allow", allow);
                write_handler_response(res, hr, &mut self.lines);
            }
            RouteOutcome::NotFound => {
                write_json_error(
                    res,
                    404,
                    json!({ "error": "Not Found", "method": method, "path": path }),
                    &mut self.lines,
                );
            }
        }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        // The previous response on this connection has been encoded by now.
        self.lines.reset();
        let Some(_guard) = self.in_flight.enter() else {
            warn!(method = %req.method(), path = %req.path(), "Rejecting request during shutdown");
            write_json_error(
                res,
                503,
                json!({ "error": "Service Unavailable" }),
                &mut self.lines,
            );
            return Ok(());
        };
        let parsed = parse_request(req)?;
        self.handle(parsed, res);
        Ok(())
    }
}
