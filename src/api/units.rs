// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use super::extract::{JsonBody, PathParams, QueryParams};
use crate::{
    error::ApiError,
    models::{CreateUnitRequest, Unit, UnitQuery, UpdateUnitRequest},
    state::AppState,
    tenant::Tenant,
};

#[utoipa::path(
    get,
    path = "/units",
    params(UnitQuery),
    tag = "Units",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [Unit]))
)]
pub async fn list_units(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<UnitQuery>,
) -> Json<Vec<Unit>> {
    let store = state.store.read().await;
    Json(store.list_units(&tenant, params.condo_id))
}

#[utoipa::path(
    post,
    path = "/units",
    request_body = CreateUnitRequest,
    tag = "Units",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = Unit),
        (status = 400, description = "Number is blank"),
        (status = 404, description = "Condominium not found in this tenant"),
        (status = 409, description = "Number/block already used in this condominium")
    )
)]
pub async fn create_unit(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUnitRequest>,
) -> Result<(StatusCode, Json<Unit>), ApiError> {
    let mut store = state.store.write().await;
    let unit = store.create_unit(&tenant, request)?;
    tracing::info!(tenant = %tenant, unit_id = unit.id, condo_id = unit.condo_id, "unit created");
    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    put,
    path = "/units/{unit_id}",
    params(
        ("unit_id" = u64, Path, description = "Identifier of the unit to update")
    ),
    request_body = UpdateUnitRequest,
    tag = "Units",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Unit),
        (status = 400, description = "Number is blank"),
        (status = 404, description = "Unit not found in this tenant"),
        (status = 409, description = "Number/block already used in this condominium")
    )
)]
pub async fn update_unit(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    PathParams(unit_id): PathParams<u64>,
    JsonBody(request): JsonBody<UpdateUnitRequest>,
) -> Result<Json<Unit>, ApiError> {
    let mut store = state.store.write().await;
    let unit = store.update_unit(&tenant, unit_id, request)?;
    Ok(Json(unit))
}

#[utoipa::path(
    delete,
    path = "/units/{unit_id}",
    params(
        ("unit_id" = u64, Path, description = "Identifier of the unit to delete")
    ),
    tag = "Units",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Unit deleted"),
        (status = 404, description = "Unit not found in this tenant")
    )
)]
pub async fn delete_unit(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    PathParams(unit_id): PathParams<u64>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_unit(&tenant, unit_id)?;
    tracing::info!(tenant = %tenant, unit_id, "unit deleted");
    Ok(StatusCode::NO_CONTENT)
}
