use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::error::ParseError;
use crate::http::request::{ParseState, Request};

/// Starting capacity of the per-request read buffer.
pub const INITIAL_BUFFER_SIZE: usize = 8;

/// Default bound on request-line plus header-block bytes.
pub const DEFAULT_MAX_HEAD_SIZE: usize = 64 * 1024;

/// Growable buffer holding bytes read but not yet parsed.
///
/// Capacity doubles whenever a read would find no spare room, and the parsed
/// prefix is dropped after every parse pass.
#[derive(Debug)]
pub struct ReadBuffer {
    buf: BytesMut,
}

impl ReadBuffer {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity.max(1)),
        }
    }

    /// Reads once from `reader` into the tail, growing first if full.
    /// Returns 0 at end of stream.
    pub async fn fill_from<R>(&mut self, reader: &mut R) -> std::io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        if self.buf.len() == self.buf.capacity() {
            let grow = self.buf.capacity().max(1);
            self.buf.reserve(grow);
        }
        reader.read_buf(&mut self.buf).await
    }

    pub fn filled(&self) -> &[u8] {
        &self.buf
    }

    /// Discards the first `n` buffered bytes.
    pub fn consume(&mut self, n: usize) {
        self.buf.advance(n);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}

impl Default for ReadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads from `reader` until a complete request has been parsed.
///
/// Returns as soon as the request is complete, without waiting for the
/// stream to end. A stream that ends first yields
/// [`ParseError::IncompleteRequest`].
pub async fn read_request<R>(reader: &mut R, max_head_size: usize) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut request = Request::new();
    let mut buffer = ReadBuffer::new();

    while !request.is_done() {
        let n = buffer.fill_from(reader).await?;
        if n == 0 {
            return Err(ParseError::IncompleteRequest);
        }

        let consumed = request.parse(buffer.filled())?;
        buffer.consume(consumed);

        let pending_head = if in_head(&request) { buffer.len() } else { 0 };
        if request.head_len() + pending_head > max_head_size {
            return Err(ParseError::HeadTooLarge { max_size: max_head_size });
        }

        tracing::trace!(
            read = n,
            consumed,
            buffered = buffer.len(),
            state = ?request.state(),
            "parsed request bytes"
        );
    }

    Ok(request)
}

fn in_head(request: &Request) -> bool {
    matches!(
        request.state(),
        ParseState::Initialized | ParseState::ParsingHeaders
    )
}
