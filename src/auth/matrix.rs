// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route authorization matrix.
//!
//! One ordered table of `(methods, path patterns, access)` rules. The first
//! rule whose method and pattern match decides; a request no rule matches is
//! denied.
//!
//! Patterns are `/`-separated. `*` matches exactly one segment and `**`
//! matches any number of segments, including none, so `/units/**` covers
//! both `/units` and `/units/7`.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, Identity, Role};
use crate::state::AppState;

/// Which HTTP methods a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatch {
    Any,
    Only(Vec<Method>),
}

impl MethodMatch {
    pub fn only(methods: &[Method]) -> Self {
        MethodMatch::Only(methods.to_vec())
    }

    fn matches(&self, method: &Method) -> bool {
        match self {
            MethodMatch::Any => true,
            MethodMatch::Only(methods) => methods.contains(method),
        }
    }
}

/// What a matching request must present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    PermitAll,
    Authenticated,
    /// Identity must hold at least one of these roles.
    AnyRole(Vec<Role>),
    DenyAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Single,
    Rest,
}

/// Glob over path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn new(raw: &str) -> Self {
        let segments = split(raw)
            .map(|segment| match segment {
                "**" => Segment::Rest,
                "*" => Segment::Single,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();
        Self { segments }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split(path).collect();
        match_segments(&self.segments, &path)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Rest, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            None => false,
            Some((head, tail)) => {
                let head_matches = match segment {
                    Segment::Literal(literal) => literal == head,
                    _ => true,
                };
                head_matches && match_segments(rest, tail)
            }
        },
    }
}

/// One row of the matrix.
#[derive(Debug, Clone)]
pub struct AuthorizationRule {
    pub methods: MethodMatch,
    pub patterns: Vec<PathPattern>,
    pub access: Access,
}

impl AuthorizationRule {
    pub fn new(methods: MethodMatch, patterns: &[&str], access: Access) -> Self {
        Self {
            methods,
            patterns: patterns.iter().map(|p| PathPattern::new(p)).collect(),
            access,
        }
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.methods.matches(method) && self.patterns.iter().any(|p| p.matches(path))
    }
}

/// Outcome of evaluating a request against the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    /// A rule needs an identity and the request has none
    Unauthenticated,
    /// Identity lacks the role, or the request is explicitly denied
    Forbidden,
}

impl Decision {
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Decision::Permit => Ok(()),
            Decision::Unauthenticated => Err(AuthError::unauthorized()),
            Decision::Forbidden => Err(AuthError::Forbidden),
        }
    }
}

/// Collections guarded by the standard matrix, with their `/api` aliases.
const PROTECTED_COLLECTIONS: &[&str] = &[
    "/condominiums/**",
    "/units/**",
    "/api/condominiums/**",
    "/api/units/**",
];

/// Immutable after startup; shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AuthorizationMatrix {
    rules: Vec<AuthorizationRule>,
}

impl AuthorizationMatrix {
    pub fn new(rules: Vec<AuthorizationRule>) -> Self {
        Self { rules }
    }

    /// The rule table served by the API.
    pub fn standard() -> Self {
        Self::new(vec![
            AuthorizationRule::new(
                MethodMatch::only(&[Method::OPTIONS]),
                &["/**"],
                Access::PermitAll,
            ),
            AuthorizationRule::new(
                MethodMatch::only(&[Method::POST]),
                &["/auth/login", "/api/auth/login"],
                Access::PermitAll,
            ),
            AuthorizationRule::new(
                MethodMatch::only(&[Method::GET]),
                &["/health/**", "/docs/**", "/api-doc/**"],
                Access::PermitAll,
            ),
            AuthorizationRule::new(
                MethodMatch::only(&[Method::GET]),
                &["/auth/me", "/api/auth/me"],
                Access::Authenticated,
            ),
            AuthorizationRule::new(
                MethodMatch::only(&[Method::GET]),
                PROTECTED_COLLECTIONS,
                Access::Authenticated,
            ),
            AuthorizationRule::new(
                MethodMatch::only(&[Method::POST, Method::PUT, Method::PATCH, Method::DELETE]),
                PROTECTED_COLLECTIONS,
                Access::AnyRole(vec![Role::ADMIN]),
            ),
            AuthorizationRule::new(MethodMatch::Any, &["/**"], Access::DenyAll),
        ])
    }

    pub fn evaluate(&self, method: &Method, path: &str, identity: Option<&Identity>) -> Decision {
        let Some(rule) = self.rules.iter().find(|rule| rule.matches(method, path)) else {
            return Decision::Forbidden;
        };

        match (&rule.access, identity) {
            (Access::PermitAll, _) => Decision::Permit,
            (Access::DenyAll, _) => Decision::Forbidden,
            (Access::Authenticated | Access::AnyRole(_), None) => Decision::Unauthenticated,
            (Access::Authenticated, Some(_)) => Decision::Permit,
            (Access::AnyRole(required), Some(identity)) => {
                if identity.has_any_role(required) {
                    Decision::Permit
                } else {
                    Decision::Forbidden
                }
            }
        }
    }
}

/// Check the request against the matrix before any handler runs.
pub async fn authorize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let identity = request.extensions().get::<Identity>();
    let decision = state
        .matrix
        .evaluate(request.method(), request.uri().path(), identity);

    match decision.into_result() {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                subject = identity.map(|id| id.subject.as_str()),
                decision = ?decision,
                "request not authorized"
            );
            err.into_response()
        }
    }
}
