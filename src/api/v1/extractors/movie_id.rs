/*
 * Responsibility
 * - Path の String を movie の external id (UUID) として受ける
 * - 失敗時は Kind::Invalid (400)、axum の素の rejection は返さない
 */
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::{Error, Kind};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieId(pub Uuid);

fn parse(raw: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw.trim()).map_err(|e| {
        Error::wrap_with(Kind::Invalid, "id must be a valid UUID", e).with_param("field", "id")
    })
}

impl FromRequestParts<AppState> for MovieId {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::wrap_with(Kind::Invalid, "missing id in path", e))?;

        parse(&raw).map(MovieId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn garbage_is_invalid() {
        let err = parse("42").unwrap_err();
        assert_eq!(err.kind(), Kind::Invalid);
        assert_eq!(err.params_text(), "field=id");
    }
}
