//! access token（Bearer JWT）検証 → RequestContext を extensions に入れる
//!
//! 流れ:
//! - RequestContext を新規作成し、設定されていれば Realm を attach
//! - `Authorization` header を解析して AccessToken を attach
//! - `access_token()` で未設定/空を Unauthenticated にする
//! - Authenticator で Subject を解決して attach
//!
//! 失敗時はこのリクエストの Realm で 401 (WWW-Authenticate 付き) を返す。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::{self, Error};
use crate::services::auth::{AccessToken, RequestContext};
use crate::state::AppState;

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = middleware::auth::authorize::apply(api::v1::routes(), state.clone());
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let mut ctx = RequestContext::new();
    if let Some(realm) = &state.realm {
        ctx = ctx.with_realm(realm.clone());
    }

    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if let Some(token) = authorization.and_then(AccessToken::from_authorization_header) {
        ctx = ctx.with_access_token(token);
    }

    match authenticate(&state, &ctx).await {
        Ok(ctx) => {
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(err) => error::respond(&err, &ctx.realm()),
    }
}

async fn authenticate(state: &AppState, ctx: &RequestContext) -> Result<RequestContext, Error> {
    let token = ctx.access_token()?;
    let subject = state.authenticator.authenticate(token).await?;
    tracing::debug!(sub = subject.id(), "authenticated");

    Ok(ctx.with_subject(subject))
}
