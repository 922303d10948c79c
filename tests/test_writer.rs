use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Write};

use courier::http::response::StatusCode;
use courier::http::writer::{NonBlockingWrite, ResponseWriter, WriteProgress};

/// Sink that accepts at most `chunk` bytes per call, or refuses with
/// `WouldBlock` while `blocked` is set.
struct ChunkedSink {
    chunk: usize,
    blocked: RefCell<bool>,
    received: RefCell<Vec<u8>>,
    calls: RefCell<usize>,
}

impl ChunkedSink {
    fn new(chunk: usize) -> Self {
        Self {
            chunk,
            blocked: RefCell::new(false),
            received: RefCell::new(Vec::new()),
            calls: RefCell::new(0),
        }
    }
}

impl NonBlockingWrite for ChunkedSink {
    fn try_write(&self, buf: &[u8]) -> io::Result<usize> {
        *self.calls.borrow_mut() += 1;
        if *self.blocked.borrow() {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        let n = buf.len().min(self.chunk);
        self.received.borrow_mut().extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

struct ClosedSink;

impl NonBlockingWrite for ClosedSink {
    fn try_write(&self, _buf: &[u8]) -> io::Result<usize> {
        Ok(0)
    }
}

fn temp_file_with(contents: &[u8]) -> (tempfile::TempDir, File) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payload");
    File::create(&path).unwrap().write_all(contents).unwrap();
    let file = File::open(&path).unwrap();
    (dir, file)
}

#[test]
fn test_status_written_in_one_call() {
    let sink = ChunkedSink::new(1024);
    let mut writer = ResponseWriter::status(StatusCode::NotFound);

    assert_eq!(writer.write_to(&sink).unwrap(), WriteProgress::Complete);
    assert_eq!(&*sink.received.borrow(), b"HTTP/1.0 404 Not Found\r\n\r\n");
    assert!(writer.is_empty());
}

#[test]
fn test_file_follows_status_line() {
    let (_dir, file) = temp_file_with(b"file contents\x00\xff");
    let sink = ChunkedSink::new(1024);
    let mut writer = ResponseWriter::file(file);

    assert!(!writer.is_empty());
    assert_eq!(writer.write_to(&sink).unwrap(), WriteProgress::Complete);
    assert_eq!(
        &*sink.received.borrow(),
        b"HTTP/1.0 200 OK\r\n\r\nfile contents\x00\xff"
    );
}

#[test]
fn test_short_writes_resume_where_they_stopped() {
    let (_dir, file) = temp_file_with(b"0123456789");
    let sink = ChunkedSink::new(8);
    let mut writer = ResponseWriter::file(file);

    let mut rounds = 0;
    while writer.write_to(&sink).unwrap() == WriteProgress::Pending {
        rounds += 1;
        assert!(rounds < 10, "writer never completed");
    }

    assert_eq!(&*sink.received.borrow(), b"HTTP/1.0 200 OK\r\n\r\n0123456789");
    assert_eq!(writer.remaining(), 0);
}

#[test]
fn test_would_block_keeps_output_queued() {
    let sink = ChunkedSink::new(1024);
    *sink.blocked.borrow_mut() = true;
    let mut writer = ResponseWriter::status(StatusCode::Ok);

    assert_eq!(writer.write_to(&sink).unwrap(), WriteProgress::Pending);
    assert_eq!(writer.remaining(), StatusCode::Ok.head().len());

    *sink.blocked.borrow_mut() = false;
    assert_eq!(writer.write_to(&sink).unwrap(), WriteProgress::Complete);
    assert_eq!(&*sink.received.borrow(), b"HTTP/1.0 200 OK\r\n\r\n");
}

#[test]
fn test_nothing_pending_is_a_no_op() {
    let sink = ChunkedSink::new(1024);
    let mut writer = ResponseWriter::status(StatusCode::Ok);
    writer.write_to(&sink).unwrap();
    let calls = *sink.calls.borrow();

    assert_eq!(writer.write_to(&sink).unwrap(), WriteProgress::Complete);
    assert_eq!(*sink.calls.borrow(), calls);
}

#[test]
fn test_zero_length_write_is_an_error() {
    let mut writer = ResponseWriter::status(StatusCode::Ok);
    let err = writer.write_to(&ClosedSink).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WriteZero);
}
