// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and identity endpoints.
//!
//! Both are mounted at `/auth/*` and `/api/auth/*`.

use axum::{extract::State, Json};

use super::extract::JsonBody;
use crate::{
    auth::{Auth, AuthError, TokenError},
    models::{LoginRequest, LoginResponse, MeResponse},
    state::AppState,
    tenant::{RequestContext, Tenant},
};

/// Exchange tenant-scoped credentials for a bearer token.
///
/// The tenant comes from `X-Tenant` (or `X-Tenant-ID`).
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    params(
        ("X-Tenant" = String, Header, description = "Tenant identifier")
    ),
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Missing tenant"),
        (status = 500, description = "Signing secret not configured")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    if !state.tokens.is_configured() {
        tracing::error!("login attempted but the signing secret is not configured");
        return Err(AuthError::SecretNotConfigured);
    }

    let tenant = RequestContext::current_tenant();
    let verified = state
        .credentials
        .authenticate(&*state.store, tenant.as_ref(), &request.email, &request.password)
        .await
        .ok_or(AuthError::InvalidCredentials)?;

    let issued = state
        .tokens
        .issue(
            &verified.subject,
            std::slice::from_ref(&verified.role),
            &state.issuer,
            state.token_ttl,
        )
        .map_err(|err| match err {
            TokenError::SecretNotConfigured => AuthError::SecretNotConfigured,
            other => {
                tracing::error!(error = %other, "failed to issue token");
                AuthError::TokenIssueFailed
            }
        })?;

    tracing::info!(
        subject = %verified.subject,
        tenant = %verified.tenant,
        role = %verified.role,
        "login succeeded"
    );

    Ok(Json(LoginResponse {
        access_token: issued.token.clone(),
        token: issued.token,
        token_type: "Bearer".to_string(),
        role: verified.role,
        roles: issued.roles,
        tenant: verified.tenant,
        expires_at: issued.expires_at,
    }))
}

/// Describe the calling identity and tenant.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current identity", body = MeResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(Auth(identity): Auth, Tenant(tenant): Tenant) -> Json<MeResponse> {
    Json(MeResponse {
        role: identity.primary_role().clone(),
        roles: identity.roles().to_vec(),
        email: identity.subject,
        tenant,
    })
}
