use std::io;
use std::sync::Arc;

use http::Method;
use may_minihttp::Request;
use tracing::debug;

use crate::dispatcher::HeaderVec;
use crate::router::ParamVec;

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    /// Raw method token as received
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// Request target including the query string
    pub target: String,
    /// HTTP headers (lowercase names)
    pub headers: HeaderVec,
    /// Decoded query string parameters, in order of appearance
    pub query_params: ParamVec,
}

impl ParsedRequest {
    /// Typed method, or `None` for tokens that are not valid HTTP methods.
    #[must_use]
    pub fn http_method(&self) -> Option<Method> {
        Method::from_bytes(self.method.as_bytes()).ok()
    }
}

/// Split a request target into path and decoded query parameters.
///
/// # Arguments
///
/// * `target` - The request target (e.g. `/file/a.jpg?size=3`)
#[must_use]
pub fn parse_target(target: &str) -> (String, ParamVec) {
    match target.split_once('?') {
        Some((path, query)) => (path.to_string(), parse_query_params(query)),
        None => (target.to_string(), ParamVec::new()),
    }
}

/// Decode a form-urlencoded query string. Repeated keys are all kept.
#[must_use]
pub fn parse_query_params(query: &str) -> ParamVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
        .collect()
}

/// Extract useful information from a `may_minihttp::Request`.
///
/// The body is read and discarded so the connection stays in sync for the
/// next pipelined request.
pub fn parse_request(req: Request) -> io::Result<ParsedRequest> {
    let method = req.method().to_string();
    let target = req.path().to_string();
    let (path, query_params) = parse_target(&target);

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase()),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    let discarded = io::copy(&mut req.body(), &mut io::sink())?;

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_param_count = query_params.len(),
        discarded_body_bytes = discarded,
        "HTTP request parsed"
    );

    Ok(ParsedRequest {
        method,
        path,
        target,
        headers,
        query_params,
    })
}
