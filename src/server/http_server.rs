use may::coroutine::JoinHandle;
use may_minihttp::HttpService;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

/// Typed wrapper around `may_minihttp`'s HTTP server.
pub struct HttpServer<T>(pub T);

/// Handle to a running accept loop.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server to be ready to accept connections
    ///
    /// Polls the server address by attempting TCP connections until successful.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if the server doesn't become ready within ~250ms (50 attempts × 5ms).
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop accepting connections.
    ///
    /// Cancels the accept coroutine and waits for it to finish. Connections
    /// that were already accepted run on their own coroutines and are not
    /// affected.
    pub fn stop(self) {
        // SAFETY: cancel() is unsafe in may because a cancelled coroutine
        // unwinds at its next yield point. The accept loop owns only the
        // listener, which is closed by that unwind, and we join it right after.
        #[allow(unsafe_code)]
        unsafe {
            self.handle.coroutine().cancel();
        }
        if self.handle.join().is_err() {
            tracing::debug!(addr = %self.addr, "Accept loop ended by cancellation");
        }
    }

    /// Block until the accept loop ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the accept coroutine panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Start the HTTP server on the given address
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the port cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let handle = may_minihttp::HttpServer(self.0).start(addr)?;
        Ok(ServerHandle { addr, handle })
    }
}
