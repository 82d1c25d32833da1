use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::http::connection::{Connection, Handler};

/// A running server: one accept loop task plus one task per connection.
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    wake: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Binds `cfg.listen_addr` and starts accepting in the background.
    pub async fn serve<H: Handler>(cfg: &ServerConfig, handler: H) -> anyhow::Result<Server> {
        let listener = TcpListener::bind(&cfg.listen_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let closed = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());
        let accept_task = tokio::spawn(accept_loop(
            listener,
            Arc::new(handler),
            cfg.max_head_size,
            closed.clone(),
            wake.clone(),
        ));

        Ok(Server {
            local_addr,
            closed,
            wake,
            accept_task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting and releases the listener. Connections already
    /// accepted are left to finish.
    pub async fn close(self) -> anyhow::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.wake.notify_one();
        self.accept_task.await?;
        info!("Stopped listening on {}", self.local_addr);
        Ok(())
    }
}

async fn accept_loop<H: Handler>(
    listener: TcpListener,
    handler: Arc<H>,
    max_head_size: usize,
    closed: Arc<AtomicBool>,
    wake: Arc<Notify>,
) {
    loop {
        let accepted = tokio::select! {
            res = listener.accept() => res,
            _ = wake.notified() => Err(std::io::Error::other("listener closed")),
        };

        let (socket, peer) = match accepted {
            Ok(conn) => conn,
            Err(e) => {
                if closed.load(Ordering::SeqCst) {
                    return;
                }
                warn!(error = %e, "failed to accept connection");
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let handler = handler.clone();
        tokio::spawn(async move {
            let conn = Connection::new(socket, max_head_size);
            if let Err(e) = conn.run(&*handler).await {
                error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
