//! Server start-up, signal handling and graceful shutdown.
//!
//! Shutdown stops the accept loop first, so no new connections are taken,
//! then waits for the in-flight request count to reach zero. Requests that
//! arrive on already-open connections after shutdown began are answered with
//! 503. If the count does not drain within the configured timeout the
//! shutdown fails with [`LifecycleError::ShutdownTimeout`].

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use super::config::ServerConfig;
use super::http_server::{HttpServer, ServerHandle};
use super::service::AppService;
use crate::handlers::{self, AppState};
use crate::registry::build_dispatcher;
use crate::router::Router;

/// Interval between in-flight checks while draining.
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] io::Error),
    #[error("shutdown timed out after {timeout:?} with {in_flight} request(s) in flight")]
    ShutdownTimeout { timeout: Duration, in_flight: usize },
    #[error("accept loop terminated abnormally")]
    AcceptLoopPanicked,
}

#[derive(Debug, Default)]
struct InFlightInner {
    active: AtomicUsize,
    draining: AtomicBool,
}

/// Counter of requests currently being served.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    inner: Arc<InFlightInner>,
}

/// Decrements the in-flight count when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    inner: Arc<InFlightInner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl InFlight {
    /// Register a request. Returns `None` once draining has started.
    ///
    /// The count is raised before the draining flag is read, so a drain that
    /// has observed zero can never be followed by a granted guard.
    #[must_use]
    pub fn enter(&self) -> Option<InFlightGuard> {
        self.inner.active.fetch_add(1, Ordering::SeqCst);
        if self.inner.draining.load(Ordering::SeqCst) {
            self.inner.active.fetch_sub(1, Ordering::SeqCst);
            return None;
        }
        Some(InFlightGuard {
            inner: Arc::clone(&self.inner),
        })
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.active.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::SeqCst)
    }

    /// Refuse new requests and wait up to `timeout` for active ones to finish.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::ShutdownTimeout`] if requests remain.
    pub fn drain(&self, timeout: Duration) -> Result<(), LifecycleError> {
        self.inner.draining.store(true, Ordering::SeqCst);
        let deadline = Instant::now() + timeout;
        loop {
            let in_flight = self.count();
            if in_flight == 0 {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(LifecycleError::ShutdownTimeout { timeout, in_flight });
            }
            thread::sleep(DRAIN_POLL_INTERVAL);
        }
    }
}

/// A started server together with what its shutdown needs.
pub struct RunningServer {
    handle: ServerHandle,
    in_flight: InFlight,
    shutdown_timeout: Duration,
}

impl RunningServer {
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.handle.addr()
    }

    #[must_use]
    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// # Errors
    ///
    /// Returns `TimedOut` if the listener does not accept connections in time.
    pub fn wait_ready(&self) -> io::Result<()> {
        self.handle.wait_ready()
    }

    /// Stop accepting connections and drain in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::ShutdownTimeout`] when requests are still
    /// running after the configured timeout.
    pub fn shutdown(self) -> Result<(), LifecycleError> {
        let addr = self.handle.addr();
        self.handle.stop();
        info!(%addr, in_flight = self.in_flight.count(), "Accept loop stopped, draining");
        self.in_flight.drain(self.shutdown_timeout)
    }

    /// Block until the accept loop ends on its own.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::AcceptLoopPanicked`] if it panicked.
    pub fn join(self) -> Result<(), LifecycleError> {
        self.handle
            .join()
            .map_err(|_| LifecycleError::AcceptLoopPanicked)
    }
}

/// Build the router and dispatcher for `state` and start serving.
///
/// # Errors
///
/// Returns [`LifecycleError::Bind`] if the listener cannot be bound.
pub fn start(config: &ServerConfig, state: &AppState) -> Result<RunningServer, LifecycleError> {
    let router = Router::new(handlers::routes());
    let dispatcher = build_dispatcher(state, config.access_log);
    let service = AppService::new(router, dispatcher);
    let in_flight = service.in_flight.clone();

    let handle = HttpServer(service)
        .start(config.bind_addr)
        .map_err(|source| LifecycleError::Bind {
            addr: config.bind_addr,
            source,
        })?;
    info!(
        addr = %config.bind_addr,
        access_log = config.access_log,
        "server started"
    );
    Ok(RunningServer {
        handle,
        in_flight,
        shutdown_timeout: config.shutdown_timeout,
    })
}

/// Block until SIGINT or SIGTERM arrives and return the signal number.
///
/// # Errors
///
/// Returns [`LifecycleError::Signal`] if the handlers cannot be installed.
#[cfg(unix)]
pub fn wait_for_signal() -> Result<i32, LifecycleError> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(LifecycleError::Signal)?;
    Ok(signals.forever().next().unwrap_or(SIGTERM))
}

/// Serve until a termination signal, then shut down gracefully.
///
/// # Errors
///
/// Propagates signal installation failures and shutdown timeouts.
#[cfg(unix)]
pub fn run_until_signal(server: RunningServer) -> Result<(), LifecycleError> {
    let signal = wait_for_signal()?;
    info!(signal, "stop signal received");
    match server.shutdown() {
        Ok(()) => {
            info!("server exited properly");
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "Graceful shutdown failed");
            Err(err)
        }
    }
}

/// Without unix signals the server runs until its accept loop ends.
///
/// # Errors
///
/// Returns [`LifecycleError::AcceptLoopPanicked`] if the accept loop panicked.
#[cfg(not(unix))]
pub fn run_until_signal(server: RunningServer) -> Result<(), LifecycleError> {
    server.join()?;
    info!("server exited properly");
    Ok(())
}
