//! Request/response middleware.
//!
//! Middleware is composed into the [`Dispatcher`](crate::dispatcher::Dispatcher)
//! when the service is built and wraps every routed handler.

mod access_log;
mod core;

pub use self::core::Middleware;
pub use access_log::AccessLogMiddleware;
