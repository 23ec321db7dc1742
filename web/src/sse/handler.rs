use axum::extract::State;
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::StreamExt;
use log::*;
use service::AppState;
use std::convert::Infallible;

/// SSE handler that establishes a long-lived connection for link updates.
///
/// The subscription is owned by the response stream. When the client goes
/// away, hyper drops the stream and the subscription deregisters itself.
/// Keep-alive comments make a half-open connection fail a write, which ends
/// the session the same way.
pub(crate) async fn sse_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    let subscription = app_state.sse_manager.register_connection();
    debug!(
        "Establishing SSE connection {}",
        subscription.connection_id().as_str()
    );

    let stream = subscription
        .into_stream()
        .map(|message| Ok::<Event, Infallible>(message.into_event()));

    let keep_alive = KeepAlive::new().interval(app_state.config.sse_keep_alive());

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        Sse::new(stream).keep_alive(keep_alive),
    )
}
