use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use crate::http::connection::{Connection, Limits};
use crate::router::Dispatcher;

/// Pause after a failed accept, so a persistent error such as fd exhaustion
/// does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

pub async fn run(listen_addr: &str, dispatcher: Dispatcher, limits: Limits) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, dispatcher, limits).await
}

/// Accepts connections forever, serving each one in its own task.
///
/// A failure in one connection, whether an error or a panic, stays inside
/// that connection's task.
pub async fn serve(listener: TcpListener, dispatcher: Dispatcher, limits: Limits) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to accept connection");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, dispatcher, limits);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
