//! HTTP/1.1 over a raw byte stream.
//!
//! Each connection serves a single request and is closed afterwards.
//!
//! # Architecture
//!
//! - **`headers`**: case-insensitive field store and the field-line parser
//! - **`request`**: request-line parsing and the incremental request state machine
//! - **`parser`**: the read loop feeding a growable buffer into the state machine
//! - **`response`**: status codes and the stateless status-line / chunk formatters
//! - **`writer`**: the response writer enforcing status line → headers → body
//! - **`connection`**: per-connection driver and the [`Handler`](connection::Handler) seam
//! - **`error`**: parse and write error types
//!
//! # Request State Machine
//!
//! ```text
//!        ┌─────────────────┐
//!        │   Initialized   │ ← Wait for the request-line
//!        └───────┬─────────┘
//!                │ request-line parsed
//!                ▼
//!        ┌─────────────────┐
//!        │ ParsingHeaders  │ ← One field line per step
//!        └───────┬─────────┘
//!                │ blank line
//!                ▼
//!        ┌─────────────────┐
//!        │  ParsingBody    │ ← Until Content-Length bytes arrived
//!        └───────┬─────────┘
//!                │ no Content-Length, or body complete
//!                ▼
//!        ┌─────────────────┐
//!        │      Done       │
//!        └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use httpfromtcp::http::connection::{ConnWriter, Handler};
//! use httpfromtcp::http::request::Request;
//! use httpfromtcp::http::response::{StatusCode, default_headers};
//!
//! struct Hello;
//!
//! #[async_trait::async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, w: &mut ConnWriter, _req: Request) -> anyhow::Result<()> {
//!         let body = b"hello\n";
//!         w.write_status_line(StatusCode::Ok).await?;
//!         w.write_headers(&default_headers(body.len())).await?;
//!         w.write_body(body).await?;
//!         Ok(())
//!     }
//! }
//! ```

pub mod connection;
pub mod error;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
