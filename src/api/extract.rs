// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Input extractors whose rejections use the `{"error": code}` body.
//!
//! axum's own `Json`, `Query` and `Path` reject with plain text that echoes
//! serde's message; these wrappers keep the status and replace the body with
//! `invalid_request`.

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    FromRequest, FromRequestParts,
};

use crate::error::ApiError;

/// Code reported for any body, query or path that fails to parse.
pub const INVALID_REQUEST: &str = "invalid_request";

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query-string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParams<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "rejected request body");
        ApiError::new(rejection.status(), INVALID_REQUEST)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "rejected query string");
        ApiError::new(rejection.status(), INVALID_REQUEST)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "rejected path parameter");
        ApiError::new(rejection.status(), INVALID_REQUEST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::IntoResponse,
    };
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn post(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_of(error: ApiError) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_body_is_extracted() {
        let JsonBody(payload) = JsonBody::<Payload>::from_request(post(r#"{"name":"A"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "A");
    }

    #[tokio::test]
    async fn syntax_error_keeps_status_and_hides_detail() {
        let err = JsonBody::<Payload>::from_request(post("{not json"), &())
            .await
            .unwrap_err();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"error":"invalid_request"}"#);
    }

    #[tokio::test]
    async fn missing_field_is_unprocessable() {
        let err = JsonBody::<Payload>::from_request(post("{}"), &())
            .await
            .unwrap_err();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, r#"{"error":"invalid_request"}"#);
    }

    #[tokio::test]
    async fn bad_query_string_is_json() {
        #[derive(Debug, Deserialize)]
        struct Filter {
            #[allow(dead_code)]
            id: u64,
        }

        let request = Request::builder().uri("/?id=abc").body(()).unwrap();
        let (mut parts, ()) = request.into_parts();
        let err = QueryParams::<Filter>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"error":"invalid_request"}"#);
    }
}
