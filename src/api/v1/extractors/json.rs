//! `Json<T>` whose rejections come back in the API's error format.
//!
//! axum's own `JsonRejection` renders as plain text with a 400/415/422; here every body
//! problem is `Kind::Invalid`.

use axum::Json;
use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use serde::de::DeserializeOwned;

use crate::error::{Error, Kind};

pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(rejection)),
        }
    }
}

fn rejected(rejection: JsonRejection) -> Error {
    let message = match &rejection {
        JsonRejection::MissingJsonContentType(_) => "expected Content-Type: application/json",
        JsonRejection::JsonSyntaxError(_) => "request body is not valid JSON",
        JsonRejection::JsonDataError(_) => "request body does not match the expected shape",
        _ => "could not read request body",
    };
    Error::wrap_with(Kind::Invalid, message, rejection)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{self, header};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        filter: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = http::Request::builder().method("PUT").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn accepts_json() {
        let JsonBody(p) = JsonBody::<Payload>::from_request(
            request(Some("application/json"), r#"{"filter":"debug"}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(p.filter, "debug");
    }

    #[tokio::test]
    async fn syntax_error_is_invalid() {
        let err = JsonBody::<Payload>::from_request(request(Some("application/json"), "{"), &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), Kind::Invalid);
        assert_eq!(err.message(), "request body is not valid JSON");
    }

    #[tokio::test]
    async fn wrong_shape_is_invalid() {
        let err = JsonBody::<Payload>::from_request(
            request(Some("application/json"), r#"{"level":1}"#),
            &(),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.kind(), Kind::Invalid);
    }

    #[tokio::test]
    async fn missing_content_type_is_invalid() {
        let err = JsonBody::<Payload>::from_request(request(None, r#"{"filter":"x"}"#), &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), Kind::Invalid);
    }
}
