//! # Router Module
//!
//! Maps an HTTP method and request path to the name of the handler that serves
//! it.
//!
//! ## Overview
//!
//! Routes are declared as `(method, pattern, handler_name)` triples. A pattern
//! is a `/`-separated list of literal segments and `{param}` placeholders; a
//! placeholder matches exactly one non-empty segment. Matching distinguishes
//! three outcomes:
//!
//! - [`RouteOutcome::Matched`] - method and path match, path params extracted
//! - [`RouteOutcome::MethodNotAllowed`] - the path exists under other methods
//! - [`RouteOutcome::NotFound`] - no pattern matches the path
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use mocksrv::router::{RouteMeta, RouteOutcome, Router};
//!
//! let router = Router::new(vec![RouteMeta::new(Method::GET, "/file/{name}", "file")]);
//! match router.route(&Method::GET, "/file/cat.jpg") {
//!     RouteOutcome::Matched(m) => assert_eq!(m.get_path_param("name"), Some("cat.jpg")),
//!     _ => unreachable!(),
//! }
//! ```

mod core;

pub use self::core::{ParamVec, RouteMatch, RouteMeta, RouteOutcome, Router, MAX_INLINE_PARAMS};
