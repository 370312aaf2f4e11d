// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the authenticated identity.
//!
//! The authentication gate does the token work; these only read what it
//! attached to the request.
//!
//! ```rust,ignore
//! async fn me(Auth(identity): Auth, Tenant(tenant): Tenant) -> impl IntoResponse {
//!     // identity.subject, identity.roles()
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Identity};

/// Extractor for an authenticated identity.
///
/// Rejects with 401 when the request carries none.
pub struct Auth(pub Identity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Auth)
            .ok_or_else(AuthError::unauthorized)
    }
}
