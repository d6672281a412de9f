/*
 * Responsibility
 * - v1 の URL 構造を定義 (/movies, /logger)
 * - 認証/認可の middleware は app 側で nest 前に掛ける
 * - fallback も layer の前に登録して、一致しない path も認証/認可を通す
 * - /health は認証不要なので app 側で v1 の外に置く
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    fallback::unknown_route,
    logger::{read_logger, update_logger},
    movies::{create_movie, delete_movie, get_movie, list_movies, update_movie},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route(
            "/movies/{id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
        .route("/logger", get(read_logger).put(update_logger))
        .fallback(unknown_route)
}
