/*
 * Responsibility
 * - /api/v1 配下でどの route にも一致しない path
 * - access/authorize の内側に置くので、未知の resource はここに来る前に deny される
 */
use axum::extract::OriginalUri;

use crate::error::Error;

pub async fn unknown_route(OriginalUri(uri): OriginalUri) -> Error {
    Error::not_found("resource not found").with_param("path", uri.path())
}
