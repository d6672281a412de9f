use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::Error;
use crate::services::auth::RequestContext;
use crate::state::AppState;

/// Handler で RequestContext を受け取るための extractor
/// access middleware が request.extensions() に insert 済みである前提
/// 見つからない場合は Unauthenticated（ミドルウェア未設定のルート）
pub struct Ctx(pub RequestContext);

impl FromRequestParts<AppState> for Ctx
where
    AppState: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(Ctx)
            .ok_or_else(|| {
                Error::unauthenticated("request is not authenticated")
                    .with_param("reason", "no_context")
            })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;
    use crate::error::Kind;
    use crate::services::auth::identity::Subject;
    use crate::state::tests::test_state;

    #[tokio::test]
    async fn takes_the_context_from_extensions() {
        let ctx = RequestContext::new().with_subject(Subject::new("alice@example.com"));
        let mut req = Request::new(());
        req.extensions_mut().insert(ctx);
        let (mut parts, _) = req.into_parts();

        let Ctx(got) = Ctx::from_request_parts(&mut parts, &test_state())
            .await
            .unwrap();
        assert_eq!(got.subject().unwrap().id(), "alice@example.com");
    }

    #[tokio::test]
    async fn missing_context_is_unauthenticated() {
        let (mut parts, _) = Request::new(()).into_parts();

        let err = Ctx::from_request_parts(&mut parts, &test_state())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), Kind::Unauthenticated);
    }
}
