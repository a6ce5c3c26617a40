use crate::{AppState, error::AppError};
use analytics::SummaryReport;
use axum::{Json, extract::State};
use core_types::{Slot, Ticker};
use events::{ComparisonFrame, HeatmapFrame};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CursorRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub slot: Slot,
    pub ticker: Ticker,
}

#[derive(Debug, Deserialize)]
pub struct StatisticsRequest {
    #[serde(default)]
    pub indices: Option<Vec<usize>>,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    #[serde(flatten)]
    pub report: SummaryReport,
    /// The report preformatted as a text table.
    pub text: String,
}

/// # GET /api/health
pub async fn health() -> &'static str {
    "OK"
}

/// # GET /api/heatmap
pub async fn get_heatmap(State(state): State<Arc<AppState>>) -> Json<HeatmapFrame> {
    Json((*state.heatmap_frame().await).clone())
}

/// # POST /api/heatmap/cursor
/// Moves the slider, as when it is dragged by hand.
pub async fn set_cursor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CursorRequest>,
) -> Result<Json<HeatmapFrame>, AppError> {
    let frame = state.seek(request.index).await?;
    Ok(Json((*frame).clone()))
}

/// # POST /api/heatmap/toggle
pub async fn toggle_playback(State(state): State<Arc<AppState>>) -> Json<HeatmapFrame> {
    Json((*state.toggle_playback().await).clone())
}

/// # GET /api/comparison
pub async fn get_comparison(State(state): State<Arc<AppState>>) -> Json<ComparisonFrame> {
    Json((*state.comparison_frame().await).clone())
}

/// # POST /api/comparison/select
pub async fn select_ticker(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<ComparisonFrame>, AppError> {
    let frame = state.select(request.slot, request.ticker).await?;
    Ok(Json((*frame).clone()))
}

/// # POST /api/comparison/statistics
/// Statistics over a brushed subset of rows; `null` means every row.
pub async fn post_statistics(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StatisticsRequest>,
) -> Result<Json<StatisticsResponse>, AppError> {
    let report = state.statistics(request.indices.as_deref()).await?;
    let text = report.render();
    Ok(Json(StatisticsResponse { report, text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::state;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn t(s: &str) -> Ticker {
        Ticker::new(s).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "OK");
    }

    #[tokio::test]
    async fn cursor_moves_and_is_broadcast() {
        let state = state();
        let mut rx = state.tx.subscribe();

        let Json(frame) = set_cursor(State(Arc::clone(&state)), Json(CursorRequest { index: 2 }))
            .await
            .unwrap();
        assert_eq!(frame.cursor.index, 2);
        assert!(matches!(rx.try_recv(), Ok(events::WsMessage::HeatmapFrame(f)) if f.cursor.index == 2));

        let Json(current) = get_heatmap(State(Arc::clone(&state))).await;
        assert_eq!(current, frame);
    }

    #[tokio::test]
    async fn cursor_out_of_range_is_bad_request() {
        let state = state();
        let err = set_cursor(State(state), Json(CursorRequest { index: 99 }))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn toggle_switches_the_label() {
        let state = state();
        let Json(frame) = toggle_playback(State(Arc::clone(&state))).await;
        assert_eq!(frame.playback.label, "Pause");
        let Json(frame) = toggle_playback(State(state)).await;
        assert_eq!(frame.playback.label, "Play");
    }

    #[tokio::test]
    async fn selection_endpoint() {
        let state = state();
        let request = SelectRequest {
            slot: Slot::First,
            ticker: t("VZ"),
        };
        let Json(frame) = select_ticker(State(Arc::clone(&state)), Json(request)).await.unwrap();
        assert_eq!(frame.title, "VZ (Green) vs. GOOG (Blue)");

        let conflict = SelectRequest {
            slot: Slot::Second,
            ticker: t("VZ"),
        };
        let err = select_ticker(State(Arc::clone(&state)), Json(conflict)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let unknown = SelectRequest {
            slot: Slot::Second,
            ticker: t("S"),
        };
        let err = select_ticker(State(state), Json(unknown)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn statistics_endpoint() {
        let state = state();
        let Json(all) = post_statistics(State(Arc::clone(&state)), Json(StatisticsRequest { indices: None }))
            .await
            .unwrap();
        assert_eq!(all.report.columns.len(), 4);
        assert!(all.text.contains("AMZN_returns"));

        let Json(empty) = post_statistics(
            State(Arc::clone(&state)),
            Json(StatisticsRequest {
                indices: Some(Vec::new()),
            }),
        )
        .await
        .unwrap();
        assert!(empty.report.columns.iter().all(|c| c.count == 0));

        let err = post_statistics(
            State(state),
            Json(StatisticsRequest {
                indices: Some(vec![1000]),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
