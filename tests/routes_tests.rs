//! End-to-end tests for every route, over real TCP connections.

mod common;

use common::{connect, send_on, TestServer};
use mocksrv::server::response::MAX_INTERNED_HEADERS;
use std::time::{Duration, Instant};

#[test]
fn test_root_returns_schema_conforming_record() {
    let server = TestServer::start();
    for _ in 0..20 {
        let resp = server.get("/");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("content-type"), Some("application/json"));
        let body = resp.json();
        assert!(body["Name"].as_str().is_some_and(|s| !s.is_empty()));
        assert!(body["City"].as_str().is_some_and(|s| !s.is_empty()));
        assert_eq!(body["Sentence"].as_str().unwrap().split_whitespace().count(), 3);
        let n: i64 = body["Number"].as_str().unwrap().parse().unwrap();
        assert!((1..=10).contains(&n));
        assert_eq!(body["Map"].as_object().unwrap().len(), 2);
        assert_eq!(body["Array"].as_array().unwrap().len(), 2);
        let range = body["ArrayRange"].as_array().unwrap().len();
        assert!((2..=6).contains(&range), "ArrayRange had {range} items");
        assert!(body["Skip"].is_null());
        assert!(chrono::DateTime::parse_from_rfc3339(body["Created"].as_str().unwrap()).is_ok());
    }
}

#[test]
fn test_root_fails_while_unhealthy() {
    let server = TestServer::start();
    assert_eq!(server.post("/healthcheck/fail").status, 200);
    for target in ["/", "/?delay=100ms", "/?delay=garbage"] {
        let resp = server.get(target);
        assert_eq!(resp.status, 500, "{target}");
        assert!(resp.text().contains("Super error"));
    }
    assert_eq!(server.post("/healthcheck/ok").status, 200);
    assert_eq!(server.get("/").status, 200);
}

#[test]
fn test_root_delay() {
    let server = TestServer::start();
    let start = Instant::now();
    let resp = server.get("/?delay=100ms");
    assert_eq!(resp.status, 200);
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[test]
fn test_root_delay_does_not_block_other_connections() {
    let server = TestServer::start();
    let addr = server.addr;
    let slow = std::thread::spawn(move || {
        common::send_request(&addr, "GET /?delay=1s HTTP/1.1\r\nHost: localhost\r\n\r\n")
    });
    std::thread::sleep(Duration::from_millis(50));
    let start = Instant::now();
    assert_eq!(server.get("/simple").status, 200);
    assert!(start.elapsed() < Duration::from_millis(900));
    assert_eq!(slow.join().unwrap().status, 200);
}

#[test]
fn test_root_invalid_delay() {
    let server = TestServer::start();
    let resp = server.get("/?delay=notaduration");
    assert_eq!(resp.status, 500);
    let text = resp.text();
    assert!(text.starts_with("Error: "), "{text}");
    assert!(text.contains("notaduration"), "{text}");
}

#[test]
fn test_file_download_size() {
    let server = TestServer::start();
    let resp = server.get("/file/foo.jpg?size=3");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body.len(), 30);
    assert_eq!(resp.header("content-type"), Some("image/jpeg"));
    assert!(resp
        .header("content-disposition")
        .unwrap()
        .contains("filename=foo.jpg"));
}

#[test]
fn test_file_download_default_size() {
    let server = TestServer::start();
    assert_eq!(server.get("/file/foo.jpg").body.len(), 10);
    let resp = server.get("/file/foo.jpg?size=lots");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body.len(), 10);
    assert_eq!(server.get("/file/foo.jpg?size=-2").body.len(), 0);
}

#[test]
fn test_simple() {
    let server = TestServer::start();
    let resp = server.get("/simple?ignored=1");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), serde_json::json!({ "name": "teste" }));
}

#[test]
fn test_health_transitions() {
    let server = TestServer::start();
    let resp = server.get("/healthcheck");
    assert_eq!((resp.status, resp.text().as_str()), (200, "Server is healthy"));

    let resp = server.post("/healthcheck/fail");
    assert_eq!((resp.status, resp.text().as_str()), (200, "Server will be not healthy"));
    let resp = server.get("/healthcheck");
    assert_eq!((resp.status, resp.text().as_str()), (500, "Server is not healthy"));
    assert!(!server.state.health.is_healthy());

    let resp = server.post("/healthcheck/ok");
    assert_eq!((resp.status, resp.text().as_str()), (200, "Server will be healthy"));
    let resp = server.get("/healthcheck");
    assert_eq!((resp.status, resp.text().as_str()), (200, "Server is healthy"));
}

#[test]
fn test_unknown_path_is_404() {
    let server = TestServer::start();
    let resp = server.get("/nope");
    assert_eq!(resp.status, 404);
    let body = resp.json();
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["path"], "/nope");
}

#[test]
fn test_wrong_method_is_405_with_allow() {
    let server = TestServer::start();
    let resp = server.get("/healthcheck/fail");
    assert_eq!(resp.status, 405);
    assert_eq!(resp.header("allow"), Some("POST"));
    assert_eq!(resp.json()["error"], "Method Not Allowed");
    assert!(server.state.health.is_healthy());

    let resp = server.post("/simple");
    assert_eq!(resp.status, 405);
    assert_eq!(resp.header("allow"), Some("GET"));
}

#[test]
fn test_keep_alive_serves_sequential_requests() {
    let server = TestServer::start();
    let mut stream = connect(&server.addr);
    for _ in 0..3 {
        let resp = send_on(
            &mut stream,
            "GET /simple HTTP/1.1\r\nHost: localhost\r\n\r\n",
        );
        assert_eq!(resp.status, 200);
        assert_eq!(resp.text(), r#"{"name":"teste"}"#);
    }
}

#[test]
fn test_content_disposition_survives_many_distinct_names() {
    let server = TestServer::start();
    let mut stream = connect(&server.addr);
    for i in 0..MAX_INTERNED_HEADERS + 100 {
        let resp = send_on(
            &mut stream,
            &format!("GET /file/img-{i}.jpg?size=0 HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        );
        assert_eq!(resp.status, 200);
        assert_eq!(
            resp.header("content-disposition"),
            Some(format!("attachment; filename=img-{i}.jpg").as_str())
        );
    }
}
