// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tenant gate middleware.
//!
//! Outermost gate of the chain: runs before authentication, so a request
//! without a tenant is refused before its token is even looked at.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::RequestContext;
use crate::auth::AuthError;
use crate::state::AppState;

/// Leading path segments that never need a tenant (compared case-insensitively).
pub const TENANT_EXEMPT_PREFIXES: &[&str] = &["/health", "/docs", "/api-doc"];

/// Whether the tenant gate lets this request through untouched.
pub fn is_exempt(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS {
        return true;
    }
    let path = path.to_ascii_lowercase();
    TENANT_EXEMPT_PREFIXES
        .iter()
        .any(|prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
}

/// Resolve the tenant and run the rest of the chain inside its scope.
pub async fn tenant_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if is_exempt(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    let Some(tenant) = state.tenants.resolve(request.headers()) else {
        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "rejecting request without tenant"
        );
        return AuthError::MissingTenant.into_response();
    };

    let context = RequestContext::new(tenant);
    request.extensions_mut().insert(context.clone());
    context.scope(next.run(request)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{self, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use crate::config::Profile;
    use crate::state::AppState;
    use crate::tenant::{Tenant, TenantId};

    fn app(state: AppState, calls: Arc<AtomicUsize>) -> Router {
        let handler = move |Tenant(tenant): Tenant| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let scoped = RequestContext::current_tenant().map(|t| t.to_string());
                format!("{tenant}|{}", scoped.unwrap_or_default())
            }
        };
        Router::new()
            .route("/units", get(handler.clone()))
            .route("/health", get(handler))
            .layer(from_fn_with_state(state.clone(), tenant_gate))
            .with_state(state)
    }

    fn get_units(tenant_header: Option<(&str, &str)>) -> Request {
        let mut builder = http::Request::builder().method(Method::GET).uri("/units");
        if let Some((name, value)) = tenant_header {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn call(app: &Router, request: Request) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn missing_tenant_is_rejected_before_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app(AppState::for_tests(), calls.clone());

        let (status, body) = call(&app, get_units(None)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, r#"{"error":"missing_tenant"}"#);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn tenant_is_published_to_extensions_and_scope() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app(AppState::for_tests(), calls.clone());

        let (status, body) = call(&app, get_units(Some(("X-Tenant-ID", " acme ")))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "acme|acme");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn context_does_not_leak_into_next_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app(AppState::for_tests(), calls.clone());

        let (_, body) = call(&app, get_units(Some(("X-Tenant", "alpha")))).await;
        assert_eq!(body, "alpha|alpha");
        assert!(RequestContext::current_tenant().is_none());

        let (status, _) = call(&app, get_units(None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dev_profile_falls_back_to_default() {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = AppState::for_tests().with_tenancy(TenantId::new("demo"), Profile::dev());
        let app = app(state, calls);

        let (status, body) = call(&app, get_units(None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "demo|demo");
    }

    #[test]
    fn exemptions_cover_health_docs_and_preflight() {
        assert!(is_exempt(&Method::GET, "/health"));
        assert!(is_exempt(&Method::GET, "/HEALTH/live"));
        assert!(is_exempt(&Method::GET, "/docs/index.html"));
        assert!(is_exempt(&Method::GET, "/api-doc/openapi.json"));
        assert!(is_exempt(&Method::OPTIONS, "/units"));
        assert!(!is_exempt(&Method::GET, "/units"));
        assert!(!is_exempt(&Method::POST, "/auth/login"));
    }

    #[test]
    fn exemption_matches_whole_segments_only() {
        assert!(is_exempt(&Method::GET, "/health/"));
        assert!(!is_exempt(&Method::GET, "/healthz"));
        assert!(!is_exempt(&Method::GET, "/docsX"));
        assert!(!is_exempt(&Method::GET, "/api-docfoo"));
    }
}
