use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::error::WriteError;
use crate::http::headers::Headers;
use crate::http::response::{self, StatusCode};

/// Position of a [`ResponseWriter`] in the response. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    AwaitingStatusLine,
    AwaitingHeaders,
    WritingBody,
}

/// Writes a response onto `W` in protocol order: status line, headers, body.
///
/// Every call made out of order fails with [`WriteError::StateViolation`]
/// and leaves the state untouched.
pub struct ResponseWriter<W> {
    inner: W,
    state: WriterState,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            state: WriterState::AwaitingStatusLine,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Writes the status line.
    ///
    /// The writer moves on to `AwaitingHeaders` even when the underlying
    /// write fails, so the reported state can run ahead of the bytes that
    /// actually reached the peer.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriteError> {
        self.expect(WriterState::AwaitingStatusLine, "write status line")?;
        self.state = WriterState::AwaitingHeaders;

        tracing::trace!(status = status.as_u16(), "writing status line");
        self.inner
            .write_all(&response::status_line(status))
            .await?;
        Ok(())
    }

    /// Writes every field followed by the blank line. Field order is unspecified.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriteError> {
        self.expect(WriterState::AwaitingHeaders, "write headers")?;
        self.state = WriterState::WritingBody;

        self.inner
            .write_all(&response::header_block(headers))
            .await?;
        Ok(())
    }

    /// Writes `body` verbatim, for content-length framing.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriteError> {
        self.expect(WriterState::WritingBody, "write body")?;

        self.inner.write_all(body).await?;
        Ok(body.len())
    }

    /// Writes `data` as a single chunk. May be called any number of times.
    ///
    /// An empty `data` writes nothing: a zero-length chunk would end the body.
    pub async fn write_chunked_body(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        self.expect(WriterState::WritingBody, "write chunked body")?;
        if data.is_empty() {
            return Ok(0);
        }

        self.inner.write_all(&response::chunk(data)).await?;
        self.inner.flush().await?;
        Ok(data.len())
    }

    /// Writes the zero-length chunk that ends a chunked body.
    pub async fn write_chunked_body_done(&mut self) -> Result<(), WriteError> {
        self.expect(WriterState::WritingBody, "write chunked body done")?;

        self.inner.write_all(response::LAST_CHUNK).await?;
        self.inner.flush().await?;
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), WriteError> {
        self.inner.flush().await?;
        Ok(())
    }

    /// Flushes and shuts down the write side of the underlying stream.
    pub async fn shutdown(&mut self) -> Result<(), WriteError> {
        self.inner.shutdown().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn expect(&self, state: WriterState, operation: &'static str) -> Result<(), WriteError> {
        if self.state != state {
            return Err(WriteError::StateViolation {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }
}

/// Writes a complete plain-text response with default headers.
pub async fn write_plain<W>(
    writer: &mut ResponseWriter<W>,
    status: StatusCode,
    body: &[u8],
) -> Result<(), WriteError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_status_line(status).await?;
    writer
        .write_headers(&response::default_headers(body.len()))
        .await?;
    writer.write_body(body).await?;
    writer.flush().await
}
