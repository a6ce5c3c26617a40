use analytics::AnalyticsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::EngineError;
use events::EventsError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Event error: {0}")]
    Events(#[from] EventsError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Engine(
                EngineError::SelectionConflict { .. } | EngineError::CursorOutOfRange { .. },
            )
            | AppError::Engine(EngineError::Analytics(AnalyticsError::RowOutOfRange { .. }))
            | AppError::Events(EventsError::InvalidCommand(_)) => StatusCode::BAD_REQUEST,
            AppError::Engine(
                EngineError::UnknownTicker(_)
                | EngineError::Analytics(AnalyticsError::UnknownTicker(_)),
            ) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed.");
            "An internal server error occurred".to_string()
        } else {
            tracing::debug!(error = %self, "Request rejected.");
            self.to_string()
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Slot;

    #[test]
    fn client_errors_map_to_4xx() {
        let conflict = AppError::from(EngineError::SelectionConflict {
            slot: Slot::First,
            ticker: "GOOG".to_string(),
        });
        assert_eq!(conflict.status(), StatusCode::BAD_REQUEST);

        let cursor = AppError::from(EngineError::CursorOutOfRange { index: 9, len: 3 });
        assert_eq!(cursor.into_response().status(), StatusCode::BAD_REQUEST);

        let rows = AppError::from(EngineError::Analytics(AnalyticsError::RowOutOfRange {
            index: 5,
            len: 2,
        }));
        assert_eq!(rows.status(), StatusCode::BAD_REQUEST);

        let command = AppError::from(EventsError::InvalidCommand("eof".to_string()));
        assert_eq!(command.status(), StatusCode::BAD_REQUEST);

        let unknown = AppError::from(EngineError::UnknownTicker("S".to_string()));
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_errors_are_internal() {
        let err = AppError::from(EngineError::EmptyTable);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
