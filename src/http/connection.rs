use std::io;
use std::net::SocketAddr;

use bytes::BytesMut;
use tokio::io::Interest;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::http::files::FileStore;
use crate::http::parser::{parse_request, ParseError};
use crate::http::request::{Method, ParsedRequest};
use crate::http::response::StatusCode;
use crate::http::writer::{ResponseWriter, WriteProgress};

/// Upper bound on a single read from a client socket.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Everything a connection needs to act on a request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub store: FileStore,
    /// Largest Content-Length a PUT may declare. `None` means unbounded.
    pub max_body_size: Option<usize>,
}

/// Per-connection protocol state.
///
/// ```text
/// AwaitingHeaders ──GET──────────────────────────┐
///        │                                       ▼
///        ├──PUT──▶ AwaitingBody ──body in──▶  Writing ──flushed──▶ Done ──▶ Closed
///        │
///        └──neither──▶ Rejected (left open until the peer leaves)
/// ```
#[derive(Debug)]
pub enum ConnectionState {
    AwaitingHeaders,
    AwaitingBody {
        request: ParsedRequest,
        content_length: usize,
    },
    Writing(ResponseWriter),
    Rejected,
    Done,
    Closed,
}

/// Why a connection was torn down.
#[derive(Debug)]
pub enum CloseReason {
    Completed,
    PeerDisconnected,
    MissingContentLength,
    BodyTooLarge { declared: usize, limit: usize },
    InvalidPath,
    Storage(io::Error),
    Io(io::Error),
    Shutdown,
}

/// What the event loop should do after a handler returns.
#[derive(Debug)]
pub enum Step {
    /// Keep the connection registered and wait for more readiness.
    Continue,
    /// Remove the connection from the registry and close it.
    Close(CloseReason),
}

pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: BytesMut,
    state: ConnectionState,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE),
            state: ConnectionState::AwaitingHeaders,
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn stream(&self) -> &TcpStream {
        &self.stream
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Readiness this connection is waiting on, if any.
    pub fn interest(&self) -> Option<Interest> {
        match self.state {
            ConnectionState::AwaitingHeaders
            | ConnectionState::AwaitingBody { .. }
            | ConnectionState::Rejected => Some(Interest::READABLE),
            ConnectionState::Writing(_) => Some(Interest::WRITABLE),
            ConnectionState::Done | ConnectionState::Closed => None,
        }
    }

    /// Handles a read-ready event: one bounded read, then advance the state
    /// machine with whatever is buffered.
    pub fn on_readable(&mut self, ctx: &RequestContext) -> Step {
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        let n = match self.stream.try_read(&mut chunk) {
            Ok(0) => return Step::Close(CloseReason::PeerDisconnected),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Step::Continue,
            Err(e) => return Step::Close(CloseReason::Io(e)),
        };

        self.buffer.extend_from_slice(&chunk[..n]);
        self.advance(ctx)
    }

    /// Handles a write-ready event. A no-op unless a response is queued.
    pub fn on_writable(&mut self) -> Step {
        let ConnectionState::Writing(writer) = &mut self.state else {
            return Step::Continue;
        };

        match writer.write_to(&self.stream) {
            Ok(WriteProgress::Complete) => {
                self.state = ConnectionState::Done;
                Step::Close(CloseReason::Completed)
            }
            Ok(WriteProgress::Pending) => Step::Continue,
            Err(e) => Step::Close(CloseReason::Io(e)),
        }
    }

    /// Releases everything the connection holds.
    ///
    /// Dropping the queued writer closes any file still open; the socket is
    /// closed when `self` goes out of scope.
    pub fn close(mut self, reason: CloseReason) {
        let previous = std::mem::replace(&mut self.state, ConnectionState::Closed);
        drop(previous);
        self.buffer.clear();

        let peer = self.peer;
        match reason {
            CloseReason::Completed => debug!(%peer, "Response sent, closing connection"),
            CloseReason::PeerDisconnected => warn!(%peer, "Client closed connection"),
            CloseReason::MissingContentLength => {
                warn!(%peer, "PUT without Content-Length, closing connection")
            }
            CloseReason::BodyTooLarge { declared, limit } => {
                warn!(%peer, declared, limit, "PUT body exceeds limit, closing connection")
            }
            CloseReason::InvalidPath => warn!(%peer, "PUT path escapes root, closing connection"),
            CloseReason::Storage(e) => warn!(%peer, error = %e, "Failed to store upload"),
            CloseReason::Io(e) => warn!(%peer, error = %e, "Socket error, closing connection"),
            CloseReason::Shutdown => debug!(%peer, "Closing connection for shutdown"),
        }
    }

    fn advance(&mut self, ctx: &RequestContext) -> Step {
        match self.state {
            ConnectionState::AwaitingHeaders => self.on_headers(ctx),
            ConnectionState::AwaitingBody { .. } => self.try_commit(ctx),
            ConnectionState::Rejected => {
                self.buffer.clear();
                Step::Continue
            }
            ConnectionState::Writing(_) | ConnectionState::Done | ConnectionState::Closed => {
                Step::Continue
            }
        }
    }

    fn on_headers(&mut self, ctx: &RequestContext) -> Step {
        let request = match parse_request(&self.buffer) {
            Ok(request) => request,
            Err(ParseError::Incomplete) => return Step::Continue,
            Err(ParseError::MalformedRequestLine) => {
                warn!(peer = %self.peer, "Malformed request line, ignoring connection");
                self.state = ConnectionState::Rejected;
                self.buffer.clear();
                return Step::Continue;
            }
        };

        debug!(
            peer = %self.peer,
            method = %request.method,
            path = %request.path,
            content_length = ?request.content_length,
            "Parsed request"
        );

        match request.method {
            Method::GET => {
                self.start_get(ctx, &request.path);
                Step::Continue
            }
            Method::PUT => {
                let Some(content_length) = request.content_length else {
                    return Step::Close(CloseReason::MissingContentLength);
                };

                if ctx.store.resolve(&request.path).is_none() {
                    return Step::Close(CloseReason::InvalidPath);
                }

                if let Some(limit) = ctx.max_body_size {
                    if content_length > limit {
                        return Step::Close(CloseReason::BodyTooLarge {
                            declared: content_length,
                            limit,
                        });
                    }
                }

                self.state = ConnectionState::AwaitingBody {
                    request,
                    content_length,
                };
                self.try_commit(ctx)
            }
        }
    }

    fn start_get(&mut self, ctx: &RequestContext, path: &str) {
        let writer = match ctx.store.open(path) {
            Ok(Some(file)) => {
                info!(peer = %self.peer, path, "Serving file");
                ResponseWriter::file(file)
            }
            Ok(None) => {
                debug!(peer = %self.peer, path, "File not found");
                ResponseWriter::status(StatusCode::NotFound)
            }
            Err(e) => {
                warn!(peer = %self.peer, path, error = %e, "Failed to open file");
                ResponseWriter::status(StatusCode::NotFound)
            }
        };

        self.state = ConnectionState::Writing(writer);
    }

    /// Persists the upload once the declared number of body bytes is buffered.
    fn try_commit(&mut self, ctx: &RequestContext) -> Step {
        let ConnectionState::AwaitingBody {
            request,
            content_length,
        } = &self.state
        else {
            return Step::Continue;
        };

        if !request.body_complete(&self.buffer) {
            return Step::Continue;
        }

        let body = &request.received_body(&self.buffer)[..*content_length];
        match ctx.store.persist(&request.path, body) {
            Ok(stored) => {
                info!(
                    peer = %self.peer,
                    path = %stored.display(),
                    bytes = body.len(),
                    "Stored upload"
                );
                self.state = ConnectionState::Writing(ResponseWriter::status(StatusCode::Ok));
                Step::Continue
            }
            Err(e) => Step::Close(CloseReason::Storage(e)),
        }
    }
}
