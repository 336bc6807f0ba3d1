//! Handler registry: binds handler names from [`handlers::routes`] to
//! functions and composes the middleware chain.

use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::handlers::{self, AppState};
use crate::middleware::AccessLogMiddleware;

/// Register every route handler, each holding a clone of `state`.
pub fn register_all(dispatcher: &mut Dispatcher, state: &AppState) {
    let s = state.clone();
    dispatcher.register_handler("root", move |req| handlers::root::root(&s, req));
    let s = state.clone();
    dispatcher.register_handler("file", move |req| handlers::file::file(&s, req));
    dispatcher.register_handler("simple", handlers::simple::simple);
    let s = state.clone();
    dispatcher.register_handler("healthcheck", move |req| handlers::health::healthcheck(&s, req));
    let s = state.clone();
    dispatcher.register_handler("healthcheck_fail", move |req| {
        handlers::health::healthcheck_fail(&s, req)
    });
    let s = state.clone();
    dispatcher.register_handler("healthcheck_ok", move |req| {
        handlers::health::healthcheck_ok(&s, req)
    });
}

/// A dispatcher with all handlers registered and, when `access_log` is set,
/// the access-log middleware in front of them.
#[must_use]
pub fn build_dispatcher(state: &AppState, access_log: bool) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    register_all(&mut dispatcher, state);
    if access_log {
        dispatcher.add_middleware(Arc::new(AccessLogMiddleware));
    }
    dispatcher
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_has_a_handler() {
        let dispatcher = build_dispatcher(&AppState::default(), false);
        for route in handlers::routes() {
            assert!(
                dispatcher.handlers.contains_key(route.handler_name.as_ref()),
                "no handler for {}",
                route.handler_name
            );
        }
        assert!(dispatcher.middlewares.is_empty());
    }

    #[test]
    fn test_access_log_is_optional() {
        assert_eq!(build_dispatcher(&AppState::default(), true).middlewares.len(), 1);
    }
}
