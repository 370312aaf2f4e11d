// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gate rejections and their HTTP rendering.

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::token::TokenError;

/// Diagnostic header attached to 401 responses.
pub const AUTH_ERROR_HEADER: HeaderName = HeaderName::from_static("x-auth-error");

/// Terminal rejection produced by one of the request gates.
///
/// Every variant ends request processing; none is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable identity. `reason` is the `X-Auth-Error` diagnostic code.
    Unauthorized { reason: &'static str },
    /// Identity present but lacking the required role, or an explicit deny
    Forbidden,
    /// No tenant could be resolved for a non-exempt request
    MissingTenant,
    /// Login attempt did not match a stored account
    InvalidCredentials,
    /// Signing secret is missing; operator misconfiguration
    SecretNotConfigured,
    /// Token could not be signed for another reason
    TokenIssueFailed,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    pub fn unauthorized() -> Self {
        AuthError::Unauthorized {
            reason: "unauthorized",
        }
    }

    /// Get the `error` code placed in the response body.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthorized { .. } => "unauthorized",
            AuthError::Forbidden => "forbidden",
            AuthError::MissingTenant => "missing_tenant",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::SecretNotConfigured => "jwt_secret_not_configured",
            AuthError::TokenIssueFailed => "token_issue_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthorized { .. } | AuthError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden | AuthError::MissingTenant => StatusCode::FORBIDDEN,
            AuthError::SecretNotConfigured | AuthError::TokenIssueFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<TokenError> for AuthError {
    /// A token that fails to decode always ends in 401, including when the
    /// secret is missing; the reason travels in the diagnostic header.
    fn from(err: TokenError) -> Self {
        AuthError::Unauthorized {
            reason: err.diagnostic(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Unauthorized { reason } => write!(f, "unauthorized ({reason})"),
            AuthError::Forbidden => write!(f, "insufficient permissions for this operation"),
            AuthError::MissingTenant => write!(f, "no tenant could be resolved"),
            AuthError::InvalidCredentials => write!(f, "invalid credentials"),
            AuthError::SecretNotConfigured => write!(f, "token signing secret is not configured"),
            AuthError::TokenIssueFailed => write!(f, "token could not be issued"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.error_code(),
        });
        let mut response = (status, body).into_response();
        if let AuthError::Unauthorized { reason } = self {
            response
                .headers_mut()
                .insert(AUTH_ERROR_HEADER, HeaderValue::from_static(reason));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_returns_401_with_diagnostic_header() {
        let response = AuthError::from(TokenError::BadIssuer).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[AUTH_ERROR_HEADER], "bad_issuer");
        assert_eq!(body_json(response).await["error"], "unauthorized");
    }

    #[tokio::test]
    async fn missing_secret_at_gate_is_still_401() {
        let response = AuthError::from(TokenError::SecretNotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[AUTH_ERROR_HEADER],
            "jwt_secret_not_configured"
        );
    }

    #[tokio::test]
    async fn forbidden_returns_403_without_header() {
        let response = AuthError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(AUTH_ERROR_HEADER).is_none());
        assert_eq!(body_json(response).await["error"], "forbidden");
    }

    #[tokio::test]
    async fn missing_tenant_returns_403() {
        let response = AuthError::MissingTenant.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"], "missing_tenant");
    }

    #[tokio::test]
    async fn login_errors_render_expected_bodies() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "invalid_credentials");

        let response = AuthError::SecretNotConfigured.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"],
            "jwt_secret_not_configured"
        );
    }
}
