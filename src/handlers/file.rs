//! Simulated binary downloads.

use std::io;

use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::{error, warn};

use super::AppState;
use crate::dispatcher::{HandlerRequest, HandlerResponse, HeaderVec, ResponseBody};

/// Bytes per chunk written to a file response.
pub const CHUNK_SIZE: usize = 10;

/// Chunk count used when `size` is missing or not an integer.
const DEFAULT_CHUNKS: usize = 1;

/// Largest chunk count served; larger `size` values are clamped (10 MB body).
pub const MAX_CHUNKS: usize = 1_000_000;

/// Source of random bytes for file bodies.
pub trait ByteSource: Send + Sync {
    /// Fill `buf` completely or fail.
    fn fill(&self, buf: &mut [u8]) -> io::Result<()>;
}

/// Operating system entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsByteSource;

impl ByteSource for OsByteSource {
    fn fill(&self, buf: &mut [u8]) -> io::Result<()> {
        OsRng.try_fill_bytes(buf).map_err(io::Error::other)
    }
}

/// Append `chunks` chunks of [`CHUNK_SIZE`] random bytes to `out`.
///
/// Stops at the first failing chunk; bytes of earlier chunks stay in `out`.
///
/// # Errors
///
/// Returns the source's error together with the number of complete chunks.
pub fn stream_random_chunks(
    source: &dyn ByteSource,
    chunks: usize,
    out: &mut Vec<u8>,
) -> Result<(), (usize, io::Error)> {
    let mut chunk = [0u8; CHUNK_SIZE];
    for written in 0..chunks {
        source.fill(&mut chunk).map_err(|e| (written, e))?;
        out.extend_from_slice(&chunk);
    }
    Ok(())
}

/// Number of chunks requested by a `size` query value.
///
/// Non-integers fall back to one chunk; negative counts produce none.
fn requested_chunks(raw: Option<&str>) -> Result<usize, std::num::ParseIntError> {
    raw.unwrap_or("")
        .parse::<i64>()
        .map(|n| usize::try_from(n).unwrap_or(0))
}

/// `GET /file/{name}?size=N`: `N * 10` random bytes served as a JPEG attachment.
pub fn file(state: &AppState, req: &HandlerRequest) -> HandlerResponse {
    let name = req.get_path_param("name").unwrap_or_default();
    let raw_size = req.get_query_param("size");
    let chunks = requested_chunks(raw_size).unwrap_or_else(|err| {
        warn!(
            request_id = %req.request_id,
            size = raw_size.unwrap_or(""),
            error = %err,
            fallback = DEFAULT_CHUNKS,
            "Invalid size, using default"
        );
        DEFAULT_CHUNKS
    });
    let chunks = if chunks > MAX_CHUNKS {
        warn!(
            request_id = %req.request_id,
            requested_chunks = chunks,
            limit = MAX_CHUNKS,
            "Size exceeds limit, clamping"
        );
        MAX_CHUNKS
    } else {
        chunks
    };

    let mut body = Vec::new();
    if let Err((written, err)) = stream_random_chunks(state.bytes.as_ref(), chunks, &mut body) {
        error!(
            request_id = %req.request_id,
            requested_chunks = chunks,
            written_chunks = written,
            error = %err,
            "Random source failed, truncating file body"
        );
    }

    let mut headers = HeaderVec::new();
    headers.push((
        "content-disposition".into(),
        format!("attachment; filename={name}"),
    ));
    headers.push(("content-type".into(), "image/jpeg".to_string()));
    HandlerResponse::new(200, headers, ResponseBody::Bytes(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::request;
    use http::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Succeeds `ok` times, then fails.
    struct Flaky {
        ok: usize,
        calls: AtomicUsize,
    }

    impl ByteSource for Flaky {
        fn fill(&self, buf: &mut [u8]) -> io::Result<()> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.ok {
                buf.fill(0xAB);
                Ok(())
            } else {
                Err(io::Error::other("entropy exhausted"))
            }
        }
    }

    fn body_len(resp: &HandlerResponse) -> usize {
        match &resp.body {
            ResponseBody::Bytes(b) => b.len(),
            other => panic!("expected bytes, got {other:?}"),
        }
    }

    fn get(state: &AppState, size: Option<&str>) -> HandlerResponse {
        let query: Vec<(&str, &str)> = size.map(|s| ("size", s)).into_iter().collect();
        file(
            state,
            &request(Method::GET, "/file/foo.jpg", &[("name", "foo.jpg")], &query),
        )
    }

    #[test]
    fn test_size_controls_body_length() {
        let state = AppState::default();
        let resp = get(&state, Some("3"));
        assert_eq!(resp.status, 200);
        assert_eq!(body_len(&resp), 30);
        assert_eq!(
            resp.get_header("content-disposition"),
            Some("attachment; filename=foo.jpg")
        );
        assert_eq!(resp.get_header("content-type"), Some("image/jpeg"));
    }

    #[test]
    fn test_missing_or_invalid_size_defaults_to_one_chunk() {
        let state = AppState::default();
        assert_eq!(body_len(&get(&state, None)), 10);
        assert_eq!(body_len(&get(&state, Some("abc"))), 10);
        assert_eq!(get(&state, Some("abc")).status, 200);
    }

    #[test]
    fn test_zero_and_negative_size_are_empty() {
        let state = AppState::default();
        assert_eq!(body_len(&get(&state, Some("0"))), 0);
        assert_eq!(body_len(&get(&state, Some("-4"))), 0);
    }

    #[test]
    fn test_huge_size_is_clamped() {
        let state = AppState {
            bytes: Arc::new(Flaky {
                ok: usize::MAX,
                calls: AtomicUsize::new(0),
            }),
            ..AppState::default()
        };
        let resp = get(&state, Some("9223372036854775807"));
        assert_eq!(resp.status, 200);
        assert_eq!(body_len(&resp), MAX_CHUNKS * CHUNK_SIZE);
        assert_eq!(
            resp.get_header("content-disposition"),
            Some("attachment; filename=foo.jpg")
        );
    }

    #[test]
    fn test_source_failure_truncates_body() {
        let state = AppState {
            bytes: Arc::new(Flaky {
                ok: 2,
                calls: AtomicUsize::new(0),
            }),
            ..AppState::default()
        };
        let resp = get(&state, Some("5"));
        assert_eq!(resp.status, 200);
        assert_eq!(body_len(&resp), 20);
    }

    #[test]
    fn test_stream_reports_written_chunks() {
        let source = Flaky {
            ok: 1,
            calls: AtomicUsize::new(0),
        };
        let mut out = Vec::new();
        let (written, err) = stream_random_chunks(&source, 3, &mut out).unwrap_err();
        assert_eq!(written, 1);
        assert_eq!(out.len(), CHUNK_SIZE);
        assert_eq!(err.to_string(), "entropy exhausted");
    }
}
