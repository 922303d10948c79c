use std::fs::File;
use std::io::{self, Read};

use tokio::net::TcpStream;

use crate::http::response::StatusCode;

/// Sink that accepts bytes without blocking.
///
/// Implemented for [`TcpStream`]; `try_write` returns `WouldBlock` when the
/// socket buffer is full.
pub trait NonBlockingWrite {
    fn try_write(&self, buf: &[u8]) -> io::Result<usize>;
}

impl NonBlockingWrite for TcpStream {
    fn try_write(&self, buf: &[u8]) -> io::Result<usize> {
        TcpStream::try_write(self, buf)
    }
}

/// Result of one write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteProgress {
    /// Everything queued has been written.
    Complete,
    /// Output remains; wait for the next write-ready event.
    Pending,
}

/// Output queued for a connection: a status head, optionally followed by the
/// contents of an open file.
///
/// The file is read in full on the first write attempt and dropped right
/// after, so its handle is closed exactly once whichever way the connection
/// ends.
#[derive(Debug)]
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
    file: Option<File>,
}

impl ResponseWriter {
    /// A bare status response with no body.
    pub fn status(status: StatusCode) -> Self {
        Self {
            buffer: status.head().to_vec(),
            written: 0,
            file: None,
        }
    }

    /// `200 OK` followed by the contents of `file`.
    pub fn file(file: File) -> Self {
        Self {
            buffer: StatusCode::Ok.head().to_vec(),
            written: 0,
            file: Some(file),
        }
    }

    /// Bytes still waiting to go out, not counting an unread file.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.written
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.remaining() == 0
    }

    /// Makes one write attempt on `sink`.
    ///
    /// A short write leaves the rest queued. Calling this with nothing
    /// pending does not touch the sink.
    pub fn write_to<W: NonBlockingWrite + ?Sized>(&mut self, sink: &W) -> io::Result<WriteProgress> {
        if let Some(mut file) = self.file.take() {
            file.read_to_end(&mut self.buffer)?;
        }

        if self.remaining() == 0 {
            return Ok(WriteProgress::Complete);
        }

        match sink.try_write(&self.buffer[self.written..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "connection closed while writing",
                ));
            }
            Ok(n) => self.written += n,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(WriteProgress::Pending),
            Err(e) => return Err(e),
        }

        if self.remaining() == 0 {
            Ok(WriteProgress::Complete)
        } else {
            Ok(WriteProgress::Pending)
        }
    }
}
