/*
 * Responsibility
 * - GET /health (疎通用、DB への ping を含む)
 * - 認証/認可の外 (app 側で /api/v1 の外に route する)
 */
use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{error::Error, state::AppState};

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, Error> {
    state.movies.ping().await?;
    Ok(Json(json!({"status": "ok", "database": "ok"})))
}
