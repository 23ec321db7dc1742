use events::EventPublisher;
use log::*;
use messaging::{ConsoleClient, MessagingClient, RqrrDecoder};
use service::{config::Config, logging::Logger, AppState};
use sse::inbound_event_handler::LinkRelayHandler;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!(
        "Starting linkcast [{}] on {}:{}",
        config.runtime_env(),
        config.interface(),
        config.port
    );

    let sse_manager = service::init_sse_manager(&config);

    let client: Option<Arc<ConsoleClient>> = config
        .console_client
        .then(|| Arc::new(ConsoleClient::new()));
    if let Some(client) = &client {
        connect_client(client, &sse_manager).await;
    } else {
        info!("No messaging client configured, serving subscribers only");
    }

    let app_state = AppState::new(config, &sse_manager);

    tokio::select! {
        result = web::init_server(app_state) => {
            if let Err(e) = result {
                error!("{e}");
                disconnect_client(client.as_deref()).await;
                std::process::exit(1);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    disconnect_client(client.as_deref()).await;
}

/// Wire the client's events through link extraction into the hub and connect.
/// A client without a stored session is left disconnected; the server still runs.
async fn connect_client<C>(client: &Arc<C>, sse_manager: &Arc<sse::Manager>)
where
    C: MessagingClient + 'static,
{
    if !client.is_logged_in() {
        warn!("Messaging client has no stored session, not connecting");
        return;
    }

    let handler = LinkRelayHandler::new(
        Arc::clone(sse_manager),
        client.clone(),
        Arc::new(RqrrDecoder),
    );
    let publisher = EventPublisher::new().with_handler(Arc::new(handler));

    if let Err(e) = client.connect(publisher).await {
        error!("Failed to connect messaging client: {e}");
    }
}

async fn disconnect_client<C: MessagingClient>(client: Option<&C>) {
    if let Some(client) = client {
        client.disconnect().await;
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
