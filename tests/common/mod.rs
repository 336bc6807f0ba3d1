//! Shared fixtures for integration tests: a real server on an ephemeral port
//! and a minimal raw HTTP/1.1 client.

#![allow(dead_code)]

use mocksrv::handlers::AppState;
use mocksrv::server::{self, RunningServer, ServerConfig};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Once;
use std::time::Duration;

static MAY_INIT: Once = Once::new();

/// Ensures May coroutines are configured only once
pub fn setup_may_runtime() {
    MAY_INIT.call_once(|| {
        may::config().set_stack_size(0x8000);
    });
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Running server, shut down on drop.
pub struct TestServer {
    server: Option<RunningServer>,
    pub addr: SocketAddr,
    pub state: AppState,
}

impl TestServer {
    pub fn start() -> Self {
        Self::start_with(|_| {})
    }

    pub fn start_with(configure: impl FnOnce(&mut ServerConfig)) -> Self {
        setup_may_runtime();
        let addr: SocketAddr = format!("127.0.0.1:{}", free_port()).parse().unwrap();
        let mut config = ServerConfig {
            bind_addr: addr,
            ..ServerConfig::default()
        };
        configure(&mut config);
        let state = AppState::default();
        let server = server::start(&config, &state).unwrap();
        server.wait_ready().unwrap();
        Self {
            server: Some(server),
            addr,
            state,
        }
    }

    /// Hand the server over for an explicit shutdown.
    pub fn take(&mut self) -> RunningServer {
        self.server.take().expect("server already taken")
    }

    pub fn get(&self, target: &str) -> RawResponse {
        send_request(&self.addr, &format!("GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n"))
    }

    pub fn post(&self, target: &str) -> RawResponse {
        send_request(
            &self.addr,
            &format!("POST {target} HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\n\r\n"),
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            let _ = server.shutdown();
        }
    }
}

#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn parse_head(head: &str) -> (u16, Vec<(String, String)>) {
    let mut lines = head.split("\r\n");
    let status = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    (status, headers)
}

/// Open a client connection with a read timeout.
pub fn connect(addr: &SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();
    stream
}

/// Send a raw request and read exactly one response, framed by
/// `Content-Length`.
pub fn send_request(addr: &SocketAddr, req: &str) -> RawResponse {
    send_on(&mut connect(addr), req)
}

/// Like [`send_request`] on an already open, keep-alive connection.
pub fn send_on(stream: &mut TcpStream, req: &str) -> RawResponse {
    stream.write_all(req.as_bytes()).unwrap();

    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        let n = stream.read(&mut tmp).unwrap();
        assert!(n > 0, "connection closed before response headers");
        buf.extend_from_slice(&tmp[..n]);
    };

    let (status, headers) = parse_head(&String::from_utf8_lossy(&buf[..head_end]));
    let content_length: usize = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf.split_off(head_end + 4);
    while body.len() < content_length {
        let n = stream.read(&mut tmp).unwrap();
        assert!(n > 0, "connection closed mid-body");
        body.extend_from_slice(&tmp[..n]);
    }
    body.truncate(content_length);

    RawResponse {
        status,
        headers,
        body,
    }
}
