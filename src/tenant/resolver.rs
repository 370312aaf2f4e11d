// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tenant resolution from request headers.

use axum::http::{HeaderMap, HeaderName};

use super::TenantId;
use crate::config::Profile;

/// Primary tenant selector header.
pub const TENANT_HEADER: HeaderName = HeaderName::from_static("x-tenant");

/// Alias accepted from older front ends.
pub const TENANT_ALIAS_HEADER: HeaderName = HeaderName::from_static("x-tenant-id");

/// Derives the active tenant for a request.
///
/// Order: `X-Tenant`, `X-Tenant-ID`, then the default tenant when the
/// profile is `dev`. The first non-blank trimmed value wins.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    default_tenant: TenantId,
    profile: Profile,
}

impl TenantResolver {
    pub fn new(default_tenant: TenantId, profile: Profile) -> Self {
        Self {
            default_tenant,
            profile,
        }
    }

    pub fn resolve(&self, headers: &HeaderMap) -> Option<TenantId> {
        header_value(headers, &TENANT_HEADER)
            .or_else(|| header_value(headers, &TENANT_ALIAS_HEADER))
            .or_else(|| {
                self.profile
                    .is_dev()
                    .then(|| self.default_tenant.clone())
            })
    }
}

fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<TenantId> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(TenantId::parse)
}
