use std::io;
use std::net::SocketAddr;
use std::task::{Context, Poll};

use anyhow::Context as _;
use tokio::net::{TcpListener, TcpStream};
use tracing::debug;

use crate::http::connection::Connection;
use crate::server::registry::{ConnectionId, Registry};

/// The listening socket.
///
/// Readiness polling accepts eagerly: when the socket is ready the accepted
/// stream is parked here until the event loop dispatches to [`Listener::accept`].
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
    pending: Option<io::Result<(TcpStream, SocketAddr)>>,
}

impl Listener {
    pub async fn bind(addr: &str) -> io::Result<Self> {
        let inner = TcpListener::bind(addr).await?;
        let local_addr = inner.local_addr()?;
        Ok(Self {
            inner,
            local_addr,
            pending: None,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Ready once a connection (or an accept error) is waiting.
    pub fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<()> {
        if self.pending.is_some() {
            return Poll::Ready(());
        }

        match self.inner.poll_accept(cx) {
            Poll::Ready(result) => {
                self.pending = Some(result);
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }

    /// Registers the waiting connection.
    ///
    /// Accepted sockets are already non-blocking. An accept failure is
    /// returned as an error and stops the server.
    pub fn accept(&mut self, registry: &mut Registry) -> anyhow::Result<Option<ConnectionId>> {
        let Some(result) = self.pending.take() else {
            return Ok(None);
        };

        let (stream, peer) = result.context("failed to accept connection")?;
        let id = registry.insert(Connection::new(stream, peer));
        debug!(conn = %id, %peer, open = registry.len(), "Accepted connection");

        Ok(Some(id))
    }
}
