// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use std::borrow::Cow;

use serde::Serialize;
use utoipa::ToSchema;

/// Namespace prefix carried by authorities.
pub const ROLE_PREFIX: &str = "ROLE_";

/// A coarse-grained permission label.
///
/// Roles are stored in canonical form: trimmed, upper-cased, without the
/// `ROLE_` prefix. `"admin"`, `"ADMIN"` and `"ROLE_admin"` are the same role.
/// The prefixed form is available through [`Role::authority`] for matching.
///
/// ## Known Roles
///
/// - `ADMIN` - May mutate every protected collection
/// - `MANAGER` - Building management staff (read access)
/// - `RESIDENT` - Default role when a token carries no role claim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "ADMIN")]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("ADMIN"));
    pub const MANAGER: Role = Role(Cow::Borrowed("MANAGER"));
    pub const RESIDENT: Role = Role(Cow::Borrowed("RESIDENT"));

    /// Canonicalize a raw role name. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Role> {
        let trimmed = raw.trim();
        let upper = trimmed.to_ascii_uppercase();
        let name = upper.strip_prefix(ROLE_PREFIX).unwrap_or(&upper).trim();
        if name.is_empty() {
            None
        } else {
            Some(Role(Cow::Owned(name.to_string())))
        }
    }

    /// Canonical name, e.g. `ADMIN`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefixed authority, e.g. `ROLE_ADMIN`.
    pub fn authority(&self) -> String {
        format!("{ROLE_PREFIX}{}", self.0)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize a list of raw role names into an ordered set.
///
/// Blank entries are dropped and later duplicates are removed, so the first
/// element stays the primary role.
pub fn canonical_roles<I, S>(raw: I) -> Vec<Role>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut roles: Vec<Role> = Vec::new();
    for role in raw.into_iter().filter_map(|r| Role::parse(r.as_ref())) {
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    roles
}
