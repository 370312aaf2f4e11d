// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the authenticated identity derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::{canonical_roles, Role};

/// Role claim as found on the wire: older tokens carry a single string,
/// newer ones a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RoleClaim {
    One(String),
    Many(Vec<String>),
}

impl RoleClaim {
    fn into_vec(self) -> Vec<String> {
        match self {
            RoleClaim::One(role) => vec![role],
            RoleClaim::Many(roles) => roles,
        }
    }
}

/// Claims carried by tokens issued by this service.
///
/// Both `roles` (list) and `role` (primary role only) are written so that
/// clients reading either claim keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (account email)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<RoleClaim>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Raw role names, plural claim first.
    pub fn role_names(&self) -> Vec<String> {
        let mut names = self.roles.clone().map(RoleClaim::into_vec).unwrap_or_default();
        if let Some(role) = &self.role {
            names.push(role.clone());
        }
        names
    }
}

/// Authenticated identity attached to a request.
///
/// Built only from a verified token; never persisted. The role list is never
/// empty and its first element is the primary role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Identity {
    /// Stable principal identifier (the account email)
    pub subject: String,

    roles: Vec<Role>,

    /// Issuer the token was minted by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl Identity {
    /// Build an identity. An empty role list falls back to `RESIDENT`.
    pub fn new(
        subject: impl Into<String>,
        roles: Vec<Role>,
        issuer: Option<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let mut roles = canonical_roles(roles.iter().map(Role::as_str));
        if roles.is_empty() {
            roles.push(Role::RESIDENT);
        }
        Self {
            subject: subject.into(),
            roles,
            issuer,
            issued_at,
            expires_at,
        }
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn primary_role(&self) -> &Role {
        &self.roles[0]
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn has_any_role(&self, required: &[Role]) -> bool {
        required.iter().any(|role| self.has_role(role))
    }

    /// Prefixed authorities (`ROLE_ADMIN`, ...) for matching.
    pub fn authorities(&self) -> Vec<String> {
        self.roles.iter().map(Role::authority).collect()
    }

    /// Unprefixed role names for display.
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.as_str().to_string()).collect()
    }
}
