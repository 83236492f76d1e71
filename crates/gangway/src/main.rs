use gangway::config::{BridgeConfig, BridgeState, DEFAULT_BIND_ADDRESS};
use gangway::dispatch::handle_request;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind_address =
        env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let state = Arc::new(BridgeState::new(BridgeConfig::from_env()));

    let listener = TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "api bridge listening");

    loop {
        let (stream, _) = listener.accept().await?;
        let peer_addr = stream.peer_addr()?;
        let io = TokioIo::new(stream);

        let state = Arc::clone(&state);
        let service = service_fn(move |req| handle_request(req, Arc::clone(&state)));

        tokio::task::spawn(async move {
            debug!(peer = ?peer_addr, "accepted connection");
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                warn!(error = ?err, "error serving connection");
            }
        });
    }
}
