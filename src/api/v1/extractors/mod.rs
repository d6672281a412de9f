/*
 * Responsibility
 * - handler が受け取る extractor の公開ポイント
 */
mod json;
mod movie_id;
mod request_ctx;

pub use json::JsonBody;
pub use movie_id::MovieId;
pub use request_ctx::Ctx;
