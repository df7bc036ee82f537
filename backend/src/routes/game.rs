use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::{
    models::{EmojiToken, GamePuzzle},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct DailyGameResponse {
    pub options: Vec<EmojiToken>,
    pub answer: Vec<EmojiToken>,
    pub required_count: usize,
}

#[derive(Debug, Serialize)]
pub struct EmojisResponse {
    pub emojis: Vec<EmojiToken>,
}

/// Error body; `detail` is only filled in when the server runs with `DEBUG`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
    detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.detail {
            Some(detail) => json!({ "error": self.message, "detail": detail }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Latest persisted puzzle, stale or not. The read side never generates.
async fn latest_puzzle(state: &AppState) -> Result<GamePuzzle, ApiError> {
    let expose = state.config.server.debug;
    match state.records.load().await {
        Ok(Some(record)) => Ok(record.puzzle),
        Ok(None) => Err(ApiError {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "Daily game has not been generated yet",
            detail: None,
        }),
        Err(e) => {
            tracing::error!("Failed to read daily game record: {}", e);
            Err(ApiError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "Daily game is temporarily unavailable",
                detail: expose.then(|| e.to_string()),
            })
        }
    }
}

pub async fn get_daily_game(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DailyGameResponse>, ApiError> {
    let puzzle = latest_puzzle(&state).await?;
    Ok(Json(DailyGameResponse {
        required_count: puzzle.required_count(),
        options: puzzle.options,
        answer: puzzle.answer,
    }))
}

pub async fn get_emojis(State(state): State<Arc<AppState>>) -> Result<Json<EmojisResponse>, ApiError> {
    let puzzle = latest_puzzle(&state).await?;
    Ok(Json(EmojisResponse {
        emojis: puzzle.options,
    }))
}
