// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `ToSchema`
//! for the OpenAPI document; field names are camelCase on the wire.
//!
//! ## Model Categories
//!
//! - **Auth**: login request/response and the caller's own identity
//! - **Condominiums**: top-level tenant resources
//! - **Units**: apartments belonging to a condominium

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Role;
use crate::tenant::TenantId;

// =============================================================================
// Auth Models
// =============================================================================

/// Login credentials. The tenant comes from the `X-Tenant` header.
#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@demo.com")]
    pub email: String,
    #[schema(example = "admin123")]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Issued bearer token.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Same value as `token`, for OAuth-style clients.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Primary role.
    pub role: Role,
    pub roles: Vec<Role>,
    pub tenant: TenantId,
    pub expires_at: DateTime<Utc>,
}

/// The caller's identity as seen by the gates.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub email: String,
    pub role: Role,
    pub roles: Vec<Role>,
    pub tenant: TenantId,
}

// =============================================================================
// Condominium Models
// =============================================================================

/// A condominium owned by one tenant.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condominium {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCondominiumRequest {
    #[schema(example = "Sunset Towers")]
    pub name: String,
}

// =============================================================================
// Unit Models
// =============================================================================

/// A unit (apartment) inside a condominium.
///
/// `(condoId, number, block)` is unique within a tenant; numbers and blocks
/// compare case-insensitively and a blank block counts as no block.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: u64,
    pub condo_id: u64,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitRequest {
    pub condo_id: u64,
    #[schema(example = "101")]
    pub number: String,
    #[serde(default)]
    #[schema(example = "A")]
    pub block: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitRequest {
    pub number: String,
    #[serde(default)]
    pub block: Option<String>,
}

/// Query parameters for listing units.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UnitQuery {
    /// Only units of this condominium.
    pub condo_id: Option<u64>,
}
