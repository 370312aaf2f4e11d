// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface.
//!
//! Request path, outermost first: request id, access log, CORS, tenant gate,
//! authentication gate, authorization matrix, handler. Routes that nothing
//! matches still pass the gates, so the matrix denies them before the
//! fallback could answer.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{matrix::authorize, middleware::authenticate, Role},
    models::{
        Condominium, CreateCondominiumRequest, CreateUnitRequest, LoginRequest, LoginResponse,
        MeResponse, Unit, UpdateUnitRequest,
    },
    state::AppState,
    tenant::{middleware::tenant_gate, TenantId},
};

pub mod auth;
pub mod condominiums;
pub mod extract;
pub mod health;
pub mod units;

/// Routes served both at the root and under `/api`.
fn domain_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route(
            "/condominiums",
            get(condominiums::list_condominiums).post(condominiums::create_condominium),
        )
        .route("/units", get(units::list_units).post(units::create_unit))
        .route(
            "/units/{unit_id}",
            put(units::update_unit).delete(units::delete_unit),
        )
}

pub fn router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    Router::new()
        .merge(domain_routes())
        .nest("/api", domain_routes())
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(from_fn_with_state(state.clone(), authorize))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(from_fn_with_state(state.clone(), tenant_gate))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::me,
        condominiums::list_condominiums,
        condominiums::create_condominium,
        units::list_units,
        units::create_unit,
        units::update_unit,
        units::delete_unit,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            MeResponse,
            Condominium,
            CreateCondominiumRequest,
            Unit,
            CreateUnitRequest,
            UpdateUnitRequest,
            Role,
            TenantId,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Login and caller identity"),
        (name = "Condominiums", description = "Condominium management"),
        (name = "Units", description = "Unit management"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
