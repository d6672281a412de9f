/*
 * Responsibility
 * - GET /logger: 現在の log filter
 * - PUT /logger: log filter の差し替え (不正な directive は 400)
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::logger::{LoggerRequest, LoggerResponse},
        extractors::JsonBody,
    },
    error::Error,
    state::AppState,
};

pub async fn read_logger(State(state): State<AppState>) -> Result<Json<LoggerResponse>, Error> {
    let filter = state.log_control.current()?;
    Ok(Json(LoggerResponse { filter }))
}

pub async fn update_logger(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoggerRequest>,
) -> Result<Json<LoggerResponse>, Error> {
    let filter = state.log_control.update(&req.filter)?;
    Ok(Json(LoggerResponse { filter }))
}
