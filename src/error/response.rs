/*
 * Responsibility
 * - Error -> HTTP response (status / challenge header / JSON error body)
 * - The wrapped cause and params go to the operator log only
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::{Error, Kind};
use crate::services::auth::identity::Realm;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

pub fn status_for(kind: Kind) -> StatusCode {
    match kind {
        Kind::Invalid => StatusCode::BAD_REQUEST,
        Kind::Unauthenticated => StatusCode::UNAUTHORIZED,
        Kind::Unauthorized => StatusCode::FORBIDDEN,
        Kind::NotFound => StatusCode::NOT_FOUND,
        Kind::Exist => StatusCode::CONFLICT,
        Kind::Database | Kind::Internal | Kind::Unanticipated => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn challenge(realm: &Realm) -> HeaderValue {
    // A realm that cannot be a header value still gets a bare scheme challenge.
    HeaderValue::from_str(&format!("Bearer realm=\"{realm}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("Bearer"))
}

fn log(err: &Error, status: StatusCode) {
    let params = err.params_text();
    let cause = err.cause_text().unwrap_or_default();

    if err.kind().is_server_fault() {
        tracing::error!(
            kind = %err.kind(),
            status = status.as_u16(),
            message = %err.message(),
            params = %params,
            cause = %cause,
            "request failed"
        );
    } else {
        tracing::info!(
            kind = %err.kind(),
            status = status.as_u16(),
            message = %err.message(),
            params = %params,
            cause = %cause,
            "request rejected"
        );
    }
}

/// Log `err` and render it as the response the client sees.
///
/// `realm` is only used for the `WWW-Authenticate` challenge of `Unauthenticated` errors.
pub fn respond(err: &Error, realm: &Realm) -> Response {
    let status = status_for(err.kind());
    log(err, status);

    let body = ErrorResponse {
        error: ErrorBody {
            kind: err.kind().as_str(),
            message: err.message().to_owned(),
        },
    };

    let mut res = (status, Json(body)).into_response();
    if err.is(Kind::Unauthenticated) {
        res.headers_mut()
            .insert(header::WWW_AUTHENTICATE, challenge(realm));
    }
    res
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        respond(&self, &Realm::default())
    }
}
