use std::future::{poll_fn, Future};
use std::task::{Context, Poll};

use tracing::{debug_span, error, info};

use crate::http::connection::{RequestContext, Step};
use crate::server::listener::Listener;
use crate::server::registry::{ConnectionId, Registry};

/// Source of a readiness event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Listener,
    Client(ConnectionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readiness {
    pub readable: bool,
    pub writable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub token: Token,
    pub readiness: Readiness,
}

/// Single-task loop multiplexing the listener and every client connection.
pub struct EventLoop {
    listener: Listener,
    registry: Registry,
    ctx: RequestContext,
}

impl EventLoop {
    pub fn new(listener: Listener, ctx: RequestContext) -> Self {
        Self {
            listener,
            registry: Registry::new(),
            ctx,
        }
    }

    /// Runs until `shutdown` resolves or accepting fails.
    ///
    /// Every open connection is closed before returning, on either path.
    pub async fn run<F>(mut self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let result = self.serve(shutdown).await;

        let closed = self.registry.close_all();
        info!(closed, "Event loop stopped");

        result
    }

    async fn serve<F>(&mut self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let events = tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    return Ok(());
                }

                events = poll_events(&mut self.listener, &self.registry) => events,
            };

            for event in events {
                self.dispatch(event)?;
            }
        }
    }

    fn dispatch(&mut self, event: Event) -> anyhow::Result<()> {
        match event.token {
            Token::Listener => {
                if let Err(e) = self.listener.accept(&mut self.registry) {
                    error!(error = %e, "Accept failed, stopping server");
                    return Err(e);
                }
            }
            Token::Client(id) => self.dispatch_client(id, event.readiness),
        }
        Ok(())
    }

    fn dispatch_client(&mut self, id: ConnectionId, readiness: Readiness) {
        let Some(conn) = self.registry.get_mut(id) else {
            return;
        };

        let span = debug_span!("conn", %id, peer = %conn.peer());
        let _enter = span.enter();

        let step = if readiness.readable {
            conn.on_readable(&self.ctx)
        } else if readiness.writable {
            conn.on_writable()
        } else {
            Step::Continue
        };

        if let Step::Close(reason) = step {
            self.registry.close(id, reason);
        }
    }
}

/// Waits until at least one registered socket is ready.
///
/// Each connection is polled only for the readiness its state asks for, so
/// an idle connection never wakes the loop.
pub async fn poll_events(listener: &mut Listener, registry: &Registry) -> Vec<Event> {
    poll_fn(|cx| poll_ready_events(cx, listener, registry)).await
}

fn poll_ready_events(
    cx: &mut Context<'_>,
    listener: &mut Listener,
    registry: &Registry,
) -> Poll<Vec<Event>> {
    let mut events = Vec::new();

    if listener.poll_ready(cx).is_ready() {
        events.push(Event {
            token: Token::Listener,
            readiness: Readiness {
                readable: true,
                writable: false,
            },
        });
    }

    for (id, conn) in registry.iter() {
        let Some(interest) = conn.interest() else {
            continue;
        };

        let readiness = Readiness {
            readable: interest.is_readable() && conn.stream().poll_read_ready(cx).is_ready(),
            writable: interest.is_writable() && conn.stream().poll_write_ready(cx).is_ready(),
        };

        if readiness.readable || readiness.writable {
            events.push(Event {
                token: Token::Client(id),
                readiness,
            });
        }
    }

    if events.is_empty() {
        Poll::Pending
    } else {
        Poll::Ready(events)
    }
}
