use api_client::PriceProvider;
use axum::{
    Router,
    routing::{get, post},
};
use configuration::Config;
use engine::{Animator, ComparatorSession, HeatmapSession};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod state;
pub mod ws;

pub use state::AppState;

/// Builds the application routes over an already initialized state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/heatmap", get(handlers::get_heatmap))
        .route("/api/heatmap/cursor", post(handlers::set_cursor))
        .route("/api/heatmap/toggle", post(handlers::toggle_playback))
        .route("/api/comparison", get(handlers::get_comparison))
        .route("/api/comparison/select", post(handlers::select_ticker))
        .route("/api/comparison/statistics", post(handlers::post_statistics))
        .route("/ws", get(ws::websocket_handler))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Loads both dashboards, starts the animator and serves until the process
/// is stopped.
///
/// Tracing is expected to be initialized by the caller.
pub async fn run_server(config: &Config, provider: Arc<dyn PriceProvider>) -> anyhow::Result<()> {
    let (heatmap, comparator) = tokio::try_join!(
        HeatmapSession::load(provider.as_ref(), &config.heatmap),
        ComparatorSession::load(provider.as_ref(), &config.comparator),
    )?;

    let state = Arc::new(AppState::new(heatmap, comparator));
    let animator = Animator::new(
        Arc::clone(&state.heatmap),
        state.tx.clone(),
        config.heatmap.tick_interval(),
    );
    let animator_task = animator.spawn();

    let addr = config.server.socket_addr();
    let app = router(state);

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app).await;

    animator_task.abort();
    served?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Sends one request through the full router and returns the status and
    /// the body, parsed as JSON where possible.
    async fn call(state: &Arc<AppState>, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = router(Arc::clone(state)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    #[tokio::test]
    async fn health_route() {
        let state = test_support::state();
        let (status, body) = call(&state, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn heatmap_routes() {
        let state = test_support::state();

        let (status, body) = call(&state, Method::GET, "/api/heatmap", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cursor"]["index"], 0);
        assert_eq!(body["tickers"], json!(["AAPL", "IBM", "NFLX"]));

        let (status, body) = call(&state, Method::POST, "/api/heatmap/cursor", Some(json!({"index": 3}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cursor"]["index"], 3);
        assert_eq!(state.heatmap_frame().await.cursor.index, 3);

        let (status, body) = call(&state, Method::POST, "/api/heatmap/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["playback"]["label"], "Pause");
    }

    #[tokio::test]
    async fn cursor_route_rejects_bad_input() {
        let state = test_support::state();

        let (status, body) = call(&state, Method::POST, "/api/heatmap/cursor", Some(json!({"index": 99}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());

        // Missing field: rejected by the JSON extractor before the handler.
        let (status, _) = call(&state, Method::POST, "/api/heatmap/cursor", Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(&state, Method::GET, "/api/heatmap/cursor", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(state.heatmap_frame().await.cursor.index, 0);
    }

    #[tokio::test]
    async fn comparison_routes() {
        let state = test_support::state();

        let (status, body) = call(&state, Method::GET, "/api/comparison", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "AMZN (Green) vs. GOOG (Blue)");
        assert_eq!(body["options_first"], json!(["AMZN", "VZ"]));

        let select = json!({"slot": "second", "ticker": "VZ"});
        let (status, body) = call(&state, Method::POST, "/api/comparison/select", Some(select)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "AMZN (Green) vs. VZ (Blue)");

        let conflict = json!({"slot": "first", "ticker": "VZ"});
        let (status, _) = call(&state, Method::POST, "/api/comparison/select", Some(conflict)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let unknown = json!({"slot": "first", "ticker": "S"});
        let (status, _) = call(&state, Method::POST, "/api/comparison/select", Some(unknown)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn statistics_route() {
        let state = test_support::state();
        let uri = "/api/comparison/statistics";

        let (status, body) = call(&state, Method::POST, uri, Some(json!({"indices": null}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["columns"].as_array().map(Vec::len), Some(4));
        assert!(body["text"].as_str().is_some_and(|text| text.contains("AMZN_returns")));

        // An omitted `indices` means every row, like `null`.
        let (status, every_row) = call(&state, Method::POST, uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(every_row, body);

        let (status, body) = call(&state, Method::POST, uri, Some(json!({"indices": [0]}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["columns"][0]["count"], 1);

        let (status, _) = call(&state, Method::POST, uri, Some(json!({"indices": [1000]}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn websocket_route_requires_an_upgrade() {
        let state = test_support::state();
        let (status, _) = call(&state, Method::GET, "/ws", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&state, Method::GET, "/api/unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
