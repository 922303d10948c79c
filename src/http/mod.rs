//! Request/response protocol.
//!
//! A deliberately small HTTP/1.0-style protocol: `GET` streams a file back,
//! `PUT` stores a Content-Length framed body. The server always closes the
//! connection after responding.
//!
//! # Architecture
//!
//! - **`parser`**: Finds the header terminator and tokenizes the request line
//! - **`request`**: Request method and parsed request head
//! - **`response`**: Status codes and their fixed status lines
//! - **`writer`**: Queued output drained on write readiness
//! - **`files`**: Path resolution under the server root, file open and store
//! - **`connection`**: The per-connection state machine driven by readiness events
//!
//! # Wire format
//!
//! ```text
//! GET /notes.txt HTTP/1.0\r\n\r\n
//! PUT /notes.txt HTTP/1.0\r\nContent-Length: 5\r\n\r\nhello
//!
//! HTTP/1.0 200 OK\r\n\r\n<file bytes>
//! HTTP/1.0 404 Not Found\r\n\r\n
//! ```

pub mod connection;
pub mod files;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
