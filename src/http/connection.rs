use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::http::parser::read_request;
use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::http::writer::{ResponseWriter, WriterState, write_plain};

/// The write side handed to handlers.
pub type ConnWriter = ResponseWriter<Box<dyn AsyncWrite + Send + Unpin>>;

/// Application logic run once per parsed request.
///
/// The writer starts in [`WriterState::AwaitingStatusLine`]; the handler is
/// responsible for driving it through to the body.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, w: &mut ConnWriter, req: Request) -> anyhow::Result<()>;
}

/// An error a handler can return instead of writing the response itself.
///
/// If nothing has been written yet, the connection answers with `status`
/// and `message` as a plain-text body.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    pub status: StatusCode,
    pub message: String,
}

impl HandlerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Serves exactly one request on a stream, then closes it.
pub struct Connection<S> {
    stream: S,
    max_head_size: usize,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    pub fn new(stream: S, max_head_size: usize) -> Self {
        Self {
            stream,
            max_head_size,
        }
    }

    pub async fn run<H>(self, handler: &H) -> anyhow::Result<()>
    where
        H: Handler + ?Sized,
    {
        let (mut reader, writer) = tokio::io::split(self.stream);
        let mut writer: ConnWriter = ResponseWriter::new(Box::new(writer));

        match read_request(&mut reader, self.max_head_size).await {
            Err(e) => {
                tracing::warn!(error = %e, "rejecting malformed request");
                write_plain(&mut writer, StatusCode::BadRequest, e.to_string().as_bytes()).await?;
            }

            Ok(req) => {
                tracing::debug!(
                    method = req.method(),
                    target = req.target(),
                    body_len = req.body.len(),
                    "request parsed"
                );

                if let Err(e) = handler.handle(&mut writer, req).await {
                    Self::handler_failed(&mut writer, e).await?;
                }
            }
        }

        writer.shutdown().await?;
        Ok(())
    }

    async fn handler_failed(writer: &mut ConnWriter, e: anyhow::Error) -> anyhow::Result<()> {
        if writer.state() != WriterState::AwaitingStatusLine {
            tracing::error!(error = %e, state = ?writer.state(), "handler failed mid-response");
            return Ok(());
        }

        let status = e
            .downcast_ref::<HandlerError>()
            .map(|h| h.status)
            .unwrap_or(StatusCode::InternalServerError);
        tracing::debug!(status = status.as_u16(), error = %e, "handler returned an error");

        write_plain(writer, status, e.to_string().as_bytes()).await?;
        Ok(())
    }
}
