// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use super::extract::JsonBody;
use crate::{
    error::ApiError,
    models::{Condominium, CreateCondominiumRequest},
    state::AppState,
    tenant::Tenant,
};

#[utoipa::path(
    get,
    path = "/condominiums",
    tag = "Condominiums",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [Condominium]))
)]
pub async fn list_condominiums(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
) -> Json<Vec<Condominium>> {
    let store = state.store.read().await;
    Json(store.list_condominiums(&tenant))
}

#[utoipa::path(
    post,
    path = "/condominiums",
    request_body = CreateCondominiumRequest,
    tag = "Condominiums",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = Condominium),
        (status = 400, description = "Name is blank")
    )
)]
pub async fn create_condominium(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateCondominiumRequest>,
) -> Result<(StatusCode, Json<Condominium>), ApiError> {
    let mut store = state.store.write().await;
    let condominium = store.create_condominium(&tenant, request)?;
    tracing::info!(tenant = %tenant, condominium_id = condominium.id, "condominium created");
    Ok((StatusCode::CREATED, Json(condominium)))
}
