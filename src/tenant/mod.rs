// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Tenant Isolation
//!
//! Every non-exempt request is bound to exactly one tenant before any
//! authentication or business logic runs.
//!
//! ## Flow
//!
//! 1. [`TenantResolver`] reads `X-Tenant`, then `X-Tenant-ID`, then (dev
//!    profile only) the configured default tenant
//! 2. [`middleware::tenant_gate`] rejects requests without a tenant (403) and
//!    otherwise runs the rest of the chain inside a [`RequestContext`] scope
//! 3. Handlers read the tenant through the [`Tenant`] extractor; every store
//!    query takes the [`TenantId`] as a parameter
//!
//! The context is dropped with the request future, so it is cleared on
//! success, error, panic and cancellation alike.

pub mod context;
pub mod extractor;
pub mod middleware;
pub mod resolver;

use serde::Serialize;
use utoipa::ToSchema;

pub use context::RequestContext;
pub use extractor::Tenant;
pub use resolver::TenantResolver;

/// Opaque, non-empty tenant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "demo")]
pub struct TenantId(String);

impl TenantId {
    /// Trim and validate a raw value. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<TenantId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(TenantId(trimmed.to_string()))
        }
    }

    /// Build from a value known to be non-blank (constants, config defaults).
    pub(crate) fn new(value: &str) -> TenantId {
        TenantId(value.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(TenantId::parse("  demo ").unwrap().as_str(), "demo");
        assert!(TenantId::parse("").is_none());
        assert!(TenantId::parse(" \t ").is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&TenantId::new("acme")).unwrap();
        assert_eq!(json, r#""acme""#);
    }
}
