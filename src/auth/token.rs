// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and verification (HS256).

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, Header, Validation};

use super::claims::{Identity, RoleClaim, TokenClaims};
use super::roles::{canonical_roles, Role};
use super::secret::SecretKey;
use crate::config::JwtConfig;

/// Clock skew tolerance (60 seconds).
pub const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Token codec failures.
///
/// `SecretNotConfigured` is an operator problem; every other decode failure
/// means the presented token is unusable.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("signing secret is not configured")]
    SecretNotConfigured,

    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,

    #[error("token issuer does not match")]
    BadIssuer,

    #[error("token has no subject")]
    MissingSubject,

    #[error("a token needs a subject")]
    BlankSubject,

    #[error("a token needs at least one role")]
    NoRoles,

    #[error("token lifetime must be at least one second")]
    InvalidTtl,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Diagnostic code reported in the `X-Auth-Error` header.
    pub fn diagnostic(&self) -> &'static str {
        match self {
            TokenError::SecretNotConfigured => "jwt_secret_not_configured",
            TokenError::BadIssuer => "bad_issuer",
            TokenError::MissingSubject => "no_subject",
            _ => "unauthorized",
        }
    }
}

/// A freshly signed token and its validity window.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub roles: Vec<Role>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Encodes and decodes bearer tokens with the process-wide secret.
///
/// Immutable after construction; shared between requests behind an `Arc`.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Option<SecretKey>,
    expected_issuer: Option<String>,
    strict_issuer: bool,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("configured", &self.secret.is_some())
            .field("expected_issuer", &self.expected_issuer)
            .field("strict_issuer", &self.strict_issuer)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: Option<SecretKey>) -> Self {
        Self {
            secret,
            expected_issuer: None,
            strict_issuer: false,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.clone())
            .with_expected_issuer(config.issuer.clone())
            .with_strict_issuer(config.strict_issuer)
    }

    /// Issuer that decoded tokens are checked against.
    pub fn with_expected_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Reject (instead of warn about) tokens minted by another issuer.
    pub fn with_strict_issuer(mut self, strict: bool) -> Self {
        self.strict_issuer = strict;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Sign a token valid from now for `ttl`.
    pub fn issue(
        &self,
        subject: &str,
        roles: &[Role],
        issuer: &str,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, roles, issuer, ttl, Utc::now())
    }

    /// Sign a token valid from `issued_at` for `ttl`.
    pub fn issue_at(
        &self,
        subject: &str,
        roles: &[Role],
        issuer: &str,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let secret = self.secret.as_ref().ok_or(TokenError::SecretNotConfigured)?;

        let subject = subject.trim();
        if subject.is_empty() {
            return Err(TokenError::BlankSubject);
        }
        let roles = canonical_roles(roles.iter().map(Role::as_str));
        let primary = roles.first().ok_or(TokenError::NoRoles)?.clone();
        let ttl_secs = i64::try_from(ttl.as_secs()).map_err(|_| TokenError::InvalidTtl)?;
        if ttl_secs == 0 {
            return Err(TokenError::InvalidTtl);
        }

        let iat = issued_at.timestamp();
        let exp = iat.checked_add(ttl_secs).ok_or(TokenError::InvalidTtl)?;
        let claims = TokenClaims {
            sub: Some(subject.to_string()),
            roles: Some(RoleClaim::Many(
                roles.iter().map(|r| r.as_str().to_string()).collect(),
            )),
            role: Some(primary.as_str().to_string()),
            iss: Some(issuer.to_string()),
            iat,
            exp,
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &secret.encoding_key(),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            roles,
            issued_at: timestamp(iat)?,
            expires_at: timestamp(exp)?,
        })
    }

    /// Verify a token and derive the identity it carries.
    pub fn decode(&self, token: &str) -> Result<Identity, TokenError> {
        let secret = self.secret.as_ref().ok_or(TokenError::SecretNotConfigured)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let claims = jsonwebtoken::decode::<TokenClaims>(token, &secret.decoding_key(), &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?
            .claims;

        if claims.exp <= claims.iat {
            return Err(TokenError::Malformed);
        }
        if claims.iat > Utc::now().timestamp() + CLOCK_SKEW_LEEWAY as i64 {
            return Err(TokenError::NotYetValid);
        }

        if let Some(expected) = &self.expected_issuer {
            if claims.iss.as_deref() != Some(expected.as_str()) {
                if self.strict_issuer {
                    return Err(TokenError::BadIssuer);
                }
                tracing::warn!(
                    expected = %expected,
                    found = ?claims.iss,
                    "accepting token from unexpected issuer"
                );
            }
        }

        let subject = claims
            .sub
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(TokenError::MissingSubject)?
            .to_string();

        let roles = canonical_roles(claims.role_names());

        Ok(Identity::new(
            subject,
            roles,
            claims.iss,
            timestamp(claims.iat)?,
            timestamp(claims.exp)?,
        ))
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::<Utc>::from_timestamp(secs, 0).ok_or(TokenError::Malformed)
}
