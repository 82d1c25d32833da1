//! httpfromtcp - HTTP/1.1 straight from a TCP socket
//!
//! Incremental request parsing, an order-enforcing response writer with
//! chunked transfer-encoding, and a task-per-connection server.

pub mod config;
pub mod http;
pub mod server;
