//! # Dispatcher Module
//!
//! Looks up the handler registered for a matched route, runs the middleware
//! chain around it and returns the handler's response.
//!
//! ## Request Flow
//!
//! 1. Router matches incoming request -> [`RouteMatch`](crate::router::RouteMatch)
//! 2. Dispatcher builds a [`HandlerRequest`] and looks up the handler by name
//! 3. Each middleware's `before` runs in order; any of them may answer early
//! 4. The handler runs inline on the connection's coroutine
//! 5. Each middleware's `after` sees the response and the handler latency
//!
//! Handlers run on the coroutine that owns the connection, so a handler that
//! sleeps (e.g. the root route's `delay`) suspends only its own request.
//!
//! ## Error Handling
//!
//! - Unregistered handler names yield `None`; the service answers 500
//! - Handler panics are caught and turned into a 500 response

mod core;

pub use self::core::{
    Dispatcher, HandlerFn, HandlerRequest, HandlerResponse, HeaderVec, ResponseBody,
    MAX_INLINE_HEADERS,
};
