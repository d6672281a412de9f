//! 認証済み Subject が (path, method) を実行してよいかを Authorizer に問い合わせる
//!
//! nest された Router の中では `req.uri()` から `/api/v1` が外れているため、
//! 判定には `OriginalUri` を使う。

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::{self, Error};
use crate::services::auth::RequestContext;
use crate::state::AppState;

/// access より内側に掛けること（RequestContext が必要）。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, authorize_middleware))
}

async fn authorize_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    req: Request<Body>,
    next: Next,
) -> Response {
    // Body は Sync ではないので、await を跨いで req を借用しない
    let Some(ctx) = req.extensions().get::<RequestContext>().cloned() else {
        let err = Error::unauthenticated("request is not authenticated")
            .with_param("reason", "no_context");
        let realm = state.realm.clone().unwrap_or_default();
        return error::respond(&err, &realm);
    };
    let method = req.method().clone();

    let decision = match ctx.subject() {
        Ok(subject) => {
            state
                .authorizer
                .authorize(subject, original_uri.path(), &method)
                .await
        }
        Err(err) => Err(err),
    };

    match decision {
        Ok(()) => next.run(req).await,
        Err(err) => error::respond(&err, &ctx.realm()),
    }
}
