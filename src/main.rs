use async_trait::async_trait;
use httpfromtcp::config::Config;
use httpfromtcp::http::connection::{ConnWriter, Handler, HandlerError};
use httpfromtcp::http::request::Request;
use httpfromtcp::http::response::StatusCode;
use httpfromtcp::server::Server;

struct Demo;

#[async_trait]
impl Handler for Demo {
    async fn handle(&self, w: &mut ConnWriter, req: Request) -> anyhow::Result<()> {
        match req.target() {
            "/yourproblem" => {
                Err(HandlerError::new(StatusCode::BadRequest, "Your problem is not my problem\n").into())
            }
            "/myproblem" => {
                Err(HandlerError::new(StatusCode::InternalServerError, "Woopsie, my bad\n").into())
            }
            target => match target.strip_prefix("/stream/") {
                Some(n) => stream_lines(w, n.parse()?).await,
                None => {
                    httpfromtcp::http::writer::write_plain(w, StatusCode::Ok, b"All good, frfr\n").await?;
                    Ok(())
                }
            },
        }
    }
}

async fn stream_lines(w: &mut ConnWriter, n: usize) -> anyhow::Result<()> {
    let mut headers = httpfromtcp::http::headers::Headers::new();
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Content-Type", "text/plain");
    headers.set("Connection", "close");

    w.write_status_line(StatusCode::Ok).await?;
    w.write_headers(&headers).await?;
    for i in 0..n {
        w.write_chunked_body(format!("line {}\n", i).as_bytes()).await?;
    }
    w.write_chunked_body_done().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();
    let server = Server::serve(&cfg.server, Demo).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.close().await
}
