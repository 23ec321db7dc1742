use crate::controller::{health_check_controller, index_controller};
use crate::sse;
use axum::{routing::get, Router};
use service::AppState;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(index_routes())
        .merge(health_routes())
        .merge(sse_routes(app_state))
}

fn index_routes() -> Router {
    Router::new().route("/", get(index_controller::index))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn sse_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events", get(sse::handler::sse_handler))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use clap::Parser;
    use http_body_util::BodyExt;
    use service::config::Config;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app_state() -> AppState {
        let config = Config::parse_from(["linkcast"]);
        let sse_manager = Arc::new(::sse::Manager::new(config.hub_config()));
        AppState::new(config, &sse_manager)
    }

    fn events_request() -> Request<Body> {
        Request::builder()
            .uri("/events")
            .body(Body::empty())
            .unwrap()
    }

    async fn next_frame(body: &mut Body) -> Vec<u8> {
        let frame = tokio::time::timeout(Duration::from_secs(1), body.frame())
            .await
            .expect("a frame should arrive")
            .expect("the stream should still be open")
            .unwrap();
        frame.into_data().unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_health_check_returns_200() {
        let app = define_routes(app_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"healthy");
    }

    #[tokio::test]
    async fn test_index_page_subscribes_to_event_stream() {
        let app = define_routes(app_state());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(r##"<a href="#" id="output""##));
        assert!(html.contains(r#"new EventSource("/events")"#));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[tokio::test]
    async fn test_event_stream_headers() {
        let app_state = app_state();
        let app = define_routes(app_state.clone());

        let response = app.oneshot(events_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::CONNECTION], "keep-alive");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(app_state.sse_manager.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_published_links_reach_open_streams_and_closed_streams_are_removed() {
        let app_state = app_state();
        let manager = Arc::clone(&app_state.sse_manager);
        let app = define_routes(app_state);

        // Subscriber A connects and receives the first link.
        let response_a = app.clone().oneshot(events_request()).await.unwrap();
        let mut body_a = response_a.into_body();
        manager.publish("https://example.com/1");
        assert_eq!(
            next_frame(&mut body_a).await,
            b"data: https://example.com/1\n\n"
        );

        // A disconnects; B connects before the second link.
        drop(body_a);
        assert_eq!(manager.connection_count(), 0);
        let response_b = app.oneshot(events_request()).await.unwrap();
        let mut body_b = response_b.into_body();

        let report = manager.publish("https://example.com/2");
        assert_eq!(report.delivered, 1);
        assert_eq!(report.disconnected, 0);

        assert_eq!(
            next_frame(&mut body_b).await,
            b"data: https://example.com/2\n\n"
        );
    }
}
