//! # mocksrv
//!
//! **mocksrv** is a mock HTTP server for exercising clients against a
//! controllable remote endpoint. It serves synthetic JSON records, simulated
//! binary downloads of configurable size, artificial latency and a health
//! flag that can be flipped at runtime to simulate outages.
//!
//! ## Architecture
//!
//! - **[`fake`]** - Random payload generator driven by a field-rule table
//! - **[`health`]** - Shared health flag
//! - **[`handlers`]** - One function per endpoint, plus the route table
//! - **[`router`]** - Method and path matching with `{param}` segments
//! - **[`dispatcher`]** - Handler lookup, middleware chain, panic isolation
//! - **[`middleware`]** - Access log
//! - **[`server`]** - `may_minihttp` service, graceful shutdown
//! - **[`cli`]**, **[`logging`]**, **[`runtime_config`]** - Process setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Service as AppService
//!     participant Router
//!     participant Dispatcher
//!     participant AccessLog as AccessLogMiddleware
//!     participant Handler
//!
//!     Client->>Server: GET /file/cat.jpg?size=3
//!     Server->>Service: call(req, res)
//!     Service->>Service: InFlight::enter()
//!     Service->>Router: route(GET, "/file/cat.jpg")
//!     Router-->>Service: Matched(file, name=cat.jpg)
//!     Service->>Dispatcher: dispatch(route_match, target, headers, request_id)
//!     Dispatcher->>AccessLog: before(req)
//!     Dispatcher->>Handler: file(state, req)
//!     Handler-->>Dispatcher: HandlerResponse(200, 30 bytes)
//!     Dispatcher->>AccessLog: after(req, res, latency)
//!     Dispatcher-->>Service: HandlerResponse
//!     Service->>Server: status, headers, body
//!     Server-->>Client: 200 OK
//! ```
//!
//! ## Routes
//!
//! | Route | Method | Response |
//! |---|---|---|
//! | `/?delay=<duration>` | GET | generated record as JSON, after the optional delay |
//! | `/file/{name}?size=<n>` | GET | `10 * n` random bytes as an `image/jpeg` attachment |
//! | `/simple` | GET | `{"name":"teste"}` |
//! | `/healthcheck` | GET | 200 or 500 depending on the health flag |
//! | `/healthcheck/fail` | POST | marks the server unhealthy |
//! | `/healthcheck/ok` | POST | marks the server healthy |
//!
//! ## Runtime Considerations
//!
//! Connections are served on `may` coroutines, not tokio tasks. Handlers run
//! inline on the connection's coroutine, and `delay` suspends only that
//! coroutine. Stack size is configurable via `MOCKSRV_STACK_SIZE`.
//!
//! ## Embedding
//!
//! ```no_run
//! use mocksrv::handlers::AppState;
//! use mocksrv::server::{self, ServerConfig};
//!
//! let running = server::start(&ServerConfig::with_port(8080), &AppState::default())
//!     .expect("bind");
//! running.wait_ready().expect("ready");
//! running.shutdown().expect("drained");
//! ```

pub mod cli;
pub mod dispatcher;
pub mod duration;
pub mod fake;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod server;
