use may::coroutine::JoinHandle;
use may_minihttp::{HttpServerWithHeaders, HttpService};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

/// Header slots per request; proxies in front of the service add several
const MAX_HEADERS: usize = 32;

/// Binds an [`HttpService`] to a socket
pub struct HttpServer<T>(pub T);

/// A running server
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server listens on
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Poll until a TCP connection succeeds, for up to one second.
    ///
    /// # Errors
    ///
    /// `TimedOut` when the listener never accepts.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..200 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Cancel the accept coroutine and wait for it to finish
    pub fn stop(self) {
        // SAFETY: the handle is owned here and the coroutine is only
        // cancelled once; cancellation is how `may` servers shut down.
        unsafe {
            self.handle.coroutine().cancel();
        }
        let _ = self.handle.join();
    }

    /// Block until the server coroutine exits.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the server coroutine panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Start serving on `addr` (`"0.0.0.0:3000"`, `"127.0.0.1:0"`, ...)
    ///
    /// # Errors
    ///
    /// Fails when the address does not resolve or cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let handle = HttpServerWithHeaders::<_, MAX_HEADERS>(self.0).start(addr)?;
        Ok(ServerHandle { addr, handle })
    }
}
