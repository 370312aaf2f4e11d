// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate.
//!
//! Runs inside the tenant gate. A request without a bearer token continues
//! anonymously and is left for the authorization matrix to judge; a request
//! with a bad token ends here with 401.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AuthError;
use crate::state::AppState;
use crate::tenant::RequestContext;

/// Login routes never look at the `Authorization` header.
pub const PUBLIC_LOGIN_PATHS: &[&str] = &["/auth/login", "/api/auth/login"];

const BEARER_SCHEME: &str = "bearer";

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. Anything else, including an
/// empty token, counts as no token at all.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Decode the bearer token, if any, and attach the identity to the request.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if PUBLIC_LOGIN_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let Some(token) = bearer_token(request.headers()) else {
        return next.run(request).await;
    };

    match state.tokens.decode(token) {
        Ok(identity) => {
            tracing::debug!(
                subject = %identity.subject,
                tenant = ?RequestContext::current_tenant().map(|t| t.to_string()),
                "request authenticated"
            );
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                reason = err.diagnostic(),
                error = %err,
                tenant = ?RequestContext::current_tenant().map(|t| t.to_string()),
                path = %request.uri().path(),
                "bearer token rejected"
            );
            AuthError::from(err).into_response()
        }
    }
}
