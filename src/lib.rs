//! Courier - single-threaded file transfer server
//!
//! Serves GET and stores PUT over a minimal HTTP/1.0-style protocol,
//! multiplexing every client connection on one task via readiness polling.

pub mod cli;
pub mod config;
pub mod http;
pub mod server;
