//! Writing [`HandlerResponse`]s onto the transport.
//!
//! `may_minihttp` stores header lines as `&'static str` and encodes them into
//! the connection's write buffer as soon as `HttpService::call` returns, before
//! the next request on that connection is read. Lines are resolved in two
//! tiers:
//!
//! - a process-wide interner leaks each distinct `Name: value` line once and
//!   reuses it, up to [`MAX_INTERNED_HEADERS`] lines;
//! - lines that no longer fit are owned by the connection's
//!   [`ConnectionLines`] and freed when its next request starts.
//!
//! A header is never dropped for lack of interner space, and memory stays
//! bounded by the interner plus one response per open connection.
//!
//! The transport has [`MAX_RESPONSE_HEADERS`] header slots per response and
//! panics past them; extra headers are dropped here with a warning instead.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock, PoisonError};

use http::StatusCode;
use may_minihttp::Response;
use serde_json::Value;
use tracing::{debug, warn};

use crate::dispatcher::{HandlerResponse, HeaderVec, ResponseBody};

/// Maximum number of distinct header lines kept alive for the process.
pub const MAX_INTERNED_HEADERS: usize = 4096;

/// Header slots `may_minihttp` 0.1 has per response, besides `Server`,
/// `Date` and `Content-Length`.
pub const MAX_RESPONSE_HEADERS: usize = 16;

struct Interner {
    lines: Mutex<HashSet<&'static str>>,
    capacity: usize,
}

impl Interner {
    fn new(capacity: usize) -> Self {
        Self {
            lines: Mutex::new(HashSet::new()),
            capacity,
        }
    }

    /// The shared copy of `line`, or `line` back when the interner is full.
    fn intern(&self, line: String) -> Result<&'static str, String> {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = lines.get(line.as_str()) {
            return Ok(*existing);
        }
        if lines.len() >= self.capacity {
            return Err(line);
        }
        let leaked: &'static str = Box::leak(line.into_boxed_str());
        lines.insert(leaked);
        Ok(leaked)
    }
}

fn interner() -> &'static Interner {
    static LINES: OnceLock<Interner> = OnceLock::new();
    LINES.get_or_init(|| Interner::new(MAX_INTERNED_HEADERS))
}

/// Header lines owned by one connection.
///
/// A clone starts empty, so every per-connection service clone has its own.
#[derive(Debug, Default)]
pub(crate) struct ConnectionLines {
    lines: Vec<Box<str>>,
}

impl Clone for ConnectionLines {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl ConnectionLines {
    /// Free the lines of the previous response on this connection.
    pub(super) fn reset(&mut self) {
        self.lines.clear();
    }

    fn hold(&mut self, line: String) -> &'static str {
        let line = line.into_boxed_str();
        let ptr: *const str = &*line;
        self.lines.push(line);
        // SAFETY: pushing the box does not move its heap allocation, which is
        // freed only by `reset` or by dropping `self`. `AppService` calls
        // `reset` at the start of the next request on the same connection and
        // is dropped when the connection closes. `may_minihttp` copies every
        // header line into its write buffer right after `call` returns, which
        // is before either of those can happen.
        #[allow(unsafe_code)]
        unsafe {
            &*ptr
        }
    }
}

/// Canonical reason phrase, `Unknown` for unregistered codes.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

/// `content-type` -> `Content-Type`, `content-disposition` -> `Content-Disposition`
fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Header values must not smuggle extra lines into the response.
fn is_safe_value(value: &str) -> bool {
    !value.bytes().any(|b| b == b'\r' || b == b'\n')
}

fn header_lines(
    interner: &Interner,
    headers: &HeaderVec,
    conn: &mut ConnectionLines,
) -> Vec<&'static str> {
    let mut out = Vec::with_capacity(headers.len().min(MAX_RESPONSE_HEADERS));
    for (name, value) in headers {
        if !is_safe_value(value) {
            warn!(header = %name, "Dropping header with line break in value");
            continue;
        }
        if out.len() == MAX_RESPONSE_HEADERS {
            warn!(
                header = %name,
                limit = MAX_RESPONSE_HEADERS,
                "Response header limit reached, dropping header"
            );
            continue;
        }
        let line = format!("{}: {}", canonical_name(name), value);
        let line = interner.intern(line).unwrap_or_else(|line| {
            debug!(header = %name, "Header interner full, line owned by connection");
            conn.hold(line)
        });
        out.push(line);
    }
    out
}

pub(crate) fn write_handler_response(
    res: &mut Response,
    hr: HandlerResponse,
    conn: &mut ConnectionLines,
) {
    res.status_code(usize::from(hr.status), status_reason(hr.status));
    for line in header_lines(interner(), &hr.headers, conn) {
        res.header(line);
    }
    match hr.body {
        ResponseBody::Json(v) => res.body_vec(v.to_string().into_bytes()),
        ResponseBody::Text(s) => res.body_vec(s.into_bytes()),
        ResponseBody::Bytes(b) => res.body_vec(b),
    }
}

pub(crate) fn write_json_error(
    res: &mut Response,
    status: u16,
    body: Value,
    conn: &mut ConnectionLines,
) {
    write_handler_response(res, HandlerResponse::json(status, body), conn);
}
