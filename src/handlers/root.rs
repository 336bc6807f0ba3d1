use tracing::{debug, error, warn};

use super::AppState;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::duration::parse_duration;
use crate::fake::generate_record;

/// `GET /`: a freshly generated record, optionally after a `delay`.
///
/// Returns 500 `Super error` while the health flag is down. A malformed
/// `delay` fails with 500 and the parse error; the sleep suspends only the
/// connection's coroutine.
pub fn root(state: &AppState, req: &HandlerRequest) -> HandlerResponse {
    if !state.health.is_healthy() {
        return HandlerResponse::text(500, "Super error");
    }

    if let Some(raw) = req.get_query_param("delay").filter(|v| !v.is_empty()) {
        match parse_duration(raw) {
            Ok(delay) if delay.is_zero() => {}
            Ok(delay) => {
                debug!(request_id = %req.request_id, delay_ms = delay.as_millis() as u64, "Delaying response");
                may::coroutine::sleep(delay);
            }
            Err(err) => {
                warn!(request_id = %req.request_id, delay = %raw, error = %err, "Invalid delay");
                return HandlerResponse::text(500, format!("Error: {err}"));
            }
        }
    }

    let record = match generate_record(state.schema, &mut rand::rng()) {
        Ok(record) => record,
        Err(err) => {
            error!(request_id = %req.request_id, error = %err, "Record generation failed");
            return HandlerResponse::text(500, format!("Error: {err}"));
        }
    };
    match serde_json::to_value(&record) {
        Ok(body) => HandlerResponse::json(200, body),
        Err(err) => {
            error!(request_id = %req.request_id, error = %err, "Record serialization failed");
            HandlerResponse::text(500, format!("Error: {err}"))
        }
    }
}
