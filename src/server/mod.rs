//! Readiness-driven server.
//!
//! One task owns the listener and a [`Registry`](registry::Registry) of
//! connections. Each iteration waits until some socket is ready, then
//! dispatches to the listener or to the connection's read/write handler.
//! Handlers never block; a connection that cannot finish a step simply waits
//! for its next readiness event. There is no idle timeout: a client that
//! connects and goes quiet holds its connection until it disconnects or the
//! server shuts down.

pub mod event_loop;
pub mod listener;
pub mod registry;

use std::future::Future;
use std::net::SocketAddr;

use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::http::connection::RequestContext;
use crate::http::files::FileStore;
use event_loop::EventLoop;
use listener::Listener;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct Server {
    event_loop: EventLoop,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the listening socket described by `cfg`.
    pub async fn bind(cfg: &Config) -> Result<Self, ServerError> {
        let addr = cfg.listen_addr();
        let listener = Listener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr();

        let ctx = RequestContext {
            store: FileStore::new(cfg.root.clone()),
            max_body_size: cfg.max_body_size,
        };

        Ok(Self {
            event_loop: EventLoop::new(listener, ctx),
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves until `shutdown` resolves, then closes every connection.
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(address = %self.local_addr, "Listening");
        self.event_loop.run(shutdown).await
    }
}
