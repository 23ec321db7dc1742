use log::*;
use service::AppState;
use tokio::net::TcpListener;

pub use error::{Error, Result};

mod controller;
pub mod error;
mod router;
mod sse;

pub use router::define_routes;

/// Binds the configured interface and port and serves the router until the
/// listener fails.
pub async fn init_server(app_state: AppState) -> Result<()> {
    let listen_addr = format!(
        "{}:{}",
        app_state.config.interface(),
        app_state.config.port
    );

    let listener = TcpListener::bind(&listen_addr)
        .await
        .map_err(|source| Error::Bind {
            address: listen_addr.clone(),
            source,
        })?;

    info!("Server running on http://{listen_addr}");

    axum::serve(listener, define_routes(app_state))
        .await
        .map_err(Error::Serve)
}
