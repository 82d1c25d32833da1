use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use httpfromtcp::http::error::WriteError;
use httpfromtcp::http::headers::Headers;
use httpfromtcp::http::response::{StatusCode, default_headers};
use httpfromtcp::http::writer::{ResponseWriter, WriterState, write_plain};
use tokio::io::AsyncWrite;

/// A sink whose peer has gone away.
struct BrokenPipe;

impl AsyncWrite for BrokenPipe {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn writer() -> ResponseWriter<Vec<u8>> {
    ResponseWriter::new(Vec::new())
}

fn single_header(name: &str, value: &str) -> Headers {
    let mut headers = Headers::new();
    headers.set(name, value);
    headers
}

#[tokio::test]
async fn test_writer_starts_awaiting_status_line() {
    assert_eq!(writer().state(), WriterState::AwaitingStatusLine);
}

#[tokio::test]
async fn test_headers_before_status_line_is_rejected() {
    let mut w = writer();
    let result = w.write_headers(&default_headers(0)).await;

    assert!(matches!(
        result,
        Err(WriteError::StateViolation { state: WriterState::AwaitingStatusLine, .. })
    ));
    assert_eq!(w.state(), WriterState::AwaitingStatusLine);
    assert!(w.into_inner().is_empty());
}

#[tokio::test]
async fn test_body_before_headers_is_rejected() {
    let mut w = writer();
    w.write_status_line(StatusCode::Ok).await.unwrap();

    assert!(matches!(
        w.write_body(b"hello").await,
        Err(WriteError::StateViolation { .. })
    ));
    assert!(matches!(
        w.write_chunked_body(b"hello").await,
        Err(WriteError::StateViolation { .. })
    ));
    assert!(matches!(
        w.write_chunked_body_done().await,
        Err(WriteError::StateViolation { .. })
    ));
    assert_eq!(w.state(), WriterState::AwaitingHeaders);
}

#[tokio::test]
async fn test_status_line_twice_is_rejected() {
    let mut w = writer();
    w.write_status_line(StatusCode::Ok).await.unwrap();

    let result = w.write_status_line(StatusCode::Ok).await;
    assert!(matches!(
        result,
        Err(WriteError::StateViolation { state: WriterState::AwaitingHeaders, .. })
    ));
}

#[tokio::test]
async fn test_headers_twice_is_rejected() {
    let mut w = writer();
    w.write_status_line(StatusCode::Ok).await.unwrap();
    w.write_headers(&Headers::new()).await.unwrap();

    assert!(matches!(
        w.write_headers(&Headers::new()).await,
        Err(WriteError::StateViolation { state: WriterState::WritingBody, .. })
    ));
}

#[tokio::test]
async fn test_fixed_length_response_bytes() {
    let mut w = writer();
    w.write_status_line(StatusCode::Ok).await.unwrap();
    w.write_headers(&single_header("Content-Length", "5")).await.unwrap();
    let n = w.write_body(b"hello").await.unwrap();

    assert_eq!(n, 5);
    assert_eq!(w.state(), WriterState::WritingBody);
    assert_eq!(
        w.into_inner(),
        b"HTTP/1.1 200 OK\r\ncontent-length: 5\r\n\r\nhello".to_vec()
    );
}

#[tokio::test]
async fn test_body_can_be_written_in_pieces() {
    let mut w = writer();
    w.write_status_line(StatusCode::Ok).await.unwrap();
    w.write_headers(&Headers::new()).await.unwrap();
    w.write_body(b"hel").await.unwrap();
    w.write_body(b"lo").await.unwrap();

    assert_eq!(w.into_inner(), b"HTTP/1.1 200 OK\r\n\r\nhello".to_vec());
}

#[tokio::test]
async fn test_chunked_body_bytes() {
    let mut w = writer();
    w.write_status_line(StatusCode::Ok).await.unwrap();
    w.write_headers(&single_header("Transfer-Encoding", "chunked")).await.unwrap();
    w.write_chunked_body(b"abc").await.unwrap();
    w.write_chunked_body_done().await.unwrap();

    let out = w.into_inner();
    let head = b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\n";
    assert!(out.starts_with(head));
    assert_eq!(&out[head.len()..], b"3\r\nabc\r\n0\r\n\r\n");
}

#[tokio::test]
async fn test_chunked_body_repeated() {
    let mut w = writer();
    w.write_status_line(StatusCode::Ok).await.unwrap();
    w.write_headers(&Headers::new()).await.unwrap();

    let first = [b'a'; 32];
    w.write_chunked_body(&first).await.unwrap();
    w.write_chunked_body(b"tail").await.unwrap();
    w.write_chunked_body_done().await.unwrap();
    assert_eq!(w.state(), WriterState::WritingBody);

    let mut expected = b"HTTP/1.1 200 OK\r\n\r\n20\r\n".to_vec();
    expected.extend_from_slice(&first);
    expected.extend_from_slice(b"\r\n4\r\ntail\r\n0\r\n\r\n");
    assert_eq!(w.into_inner(), expected);
}

#[tokio::test]
async fn test_unknown_status_code_has_no_reason() {
    let mut w = writer();
    w.write_status_line(StatusCode::Other(404)).await.unwrap();

    assert_eq!(w.into_inner(), b"HTTP/1.1 404\r\n".to_vec());
}

#[tokio::test]
async fn test_write_plain() {
    let mut w = writer();
    write_plain(&mut w, StatusCode::BadRequest, b"bad input").await.unwrap();

    let out = String::from_utf8(w.into_inner()).unwrap();
    let (head, body) = out.split_once("\r\n\r\n").unwrap();
    let mut lines: Vec<&str> = head.split("\r\n").collect();

    assert_eq!(lines.remove(0), "HTTP/1.1 400 Bad Request");
    lines.sort();
    assert_eq!(
        lines,
        vec!["connection: close", "content-length: 9", "content-type: text/plain"]
    );
    assert_eq!(body, "bad input");
}

#[tokio::test]
async fn test_failed_status_line_still_advances_state() {
    let mut w = ResponseWriter::new(BrokenPipe);
    let result = w.write_status_line(StatusCode::Ok).await;

    assert!(matches!(result, Err(WriteError::Io { .. })));
    assert_eq!(w.state(), WriterState::AwaitingHeaders);

    // the next step is now headers, not a second status line
    assert!(matches!(
        w.write_status_line(StatusCode::Ok).await,
        Err(WriteError::StateViolation { .. })
    ));
}

#[tokio::test]
async fn test_empty_chunk_does_not_end_body() {
    let mut w = writer();
    w.write_status_line(StatusCode::Ok).await.unwrap();
    w.write_headers(&Headers::new()).await.unwrap();

    assert_eq!(w.write_chunked_body(b"").await.unwrap(), 0);
    w.write_chunked_body(b"abc").await.unwrap();
    w.write_chunked_body_done().await.unwrap();

    assert_eq!(
        w.into_inner(),
        b"HTTP/1.1 200 OK\r\n\r\n3\r\nabc\r\n0\r\n\r\n".to_vec()
    );
}

#[tokio::test]
async fn test_empty_chunk_still_requires_body_state() {
    let mut w = writer();

    assert!(matches!(
        w.write_chunked_body(b"").await,
        Err(WriteError::StateViolation { .. })
    ));
}
