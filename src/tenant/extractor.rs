// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the resolved tenant.
//!
//! ```rust,ignore
//! async fn list_units(Tenant(tenant): Tenant, State(state): State<AppState>) { ... }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{RequestContext, TenantId};
use crate::auth::AuthError;

/// The tenant published by the tenant gate.
///
/// Rejects with `MissingTenant` when the gate did not run, so a handler
/// mounted outside the gate can never execute without a tenant.
pub struct Tenant(pub TenantId);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .map(|ctx| Tenant(ctx.tenant().clone()))
            .ok_or(AuthError::MissingTenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn reads_context_from_extensions() {
        let mut parts = Request::builder().uri("/units").body(()).unwrap().into_parts().0;
        parts
            .extensions
            .insert(RequestContext::new(TenantId::new("acme")));

        let Tenant(tenant) = Tenant::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(tenant.as_str(), "acme");
    }

    #[tokio::test]
    async fn rejects_without_context() {
        let mut parts = Request::builder().uri("/units").body(()).unwrap().into_parts().0;
        let result = Tenant::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingTenant)));
    }
}
