// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! loader used at startup. Configuration is read once and never mutated.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_PROFILE` | Active profile (`dev` enables tenant fallback and seed data) | empty |
//! | `JWT_SECRET` | Token signing secret, plain text or `base64:<data>` | unset |
//! | `JWT_ISSUER` | Issuer written into and expected from tokens | `condo-api` |
//! | `JWT_EXPIRATION_MINUTES` | Token lifetime | `120` |
//! | `JWT_STRICT_ISSUER` | Reject tokens from another issuer instead of warning | `false` |
//! | `TENANT_DEFAULT` | Tenant used when no header is sent (dev profile only) | `demo` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::auth::secret::{SecretError, SecretKey};
use crate::tenant::TenantId;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const PROFILE_ENV: &str = "APP_PROFILE";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const JWT_EXPIRATION_ENV: &str = "JWT_EXPIRATION_MINUTES";
pub const JWT_STRICT_ISSUER_ENV: &str = "JWT_STRICT_ISSUER";
pub const TENANT_DEFAULT_ENV: &str = "TENANT_DEFAULT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ISSUER: &str = "condo-api";
pub const DEFAULT_EXPIRATION_MINUTES: u64 = 120;
pub const DEFAULT_TENANT: &str = "demo";

/// Configuration loading errors. Any of these aborts startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("unusable {key}: {source}")]
    Secret {
        key: &'static str,
        #[source]
        source: SecretError,
    },
}

/// Deployment profile, mirrored from `APP_PROFILE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile(String);

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn dev() -> Self {
        Self::new("dev")
    }

    pub fn is_dev(&self) -> bool {
        self.0.eq_ignore_ascii_case("dev")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Token issuance and validation settings.
#[derive(Clone)]
pub struct JwtConfig {
    /// `None` when `JWT_SECRET` is unset; issuance and decoding then fail
    /// with `jwt_secret_not_configured`.
    pub secret: Option<SecretKey>,
    pub issuer: String,
    pub ttl: Duration,
    pub strict_issuer: bool,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.debug_struct("JwtConfig")
            .field("secret_configured", &self.secret.is_some())
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .field("strict_issuer", &self.strict_issuer)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub profile: Profile,
    pub jwt: JwtConfig,
    pub default_tenant: TenantId,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::new(parse_host(&host)?, port);

        let profile = Profile::new(get(PROFILE_ENV).unwrap_or_default());

        let secret = get(JWT_SECRET_ENV)
            .map(|raw| SecretKey::parse(&raw))
            .transpose()
            .map_err(|source| ConfigError::Secret {
                key: JWT_SECRET_ENV,
                source,
            })?;

        let issuer = get(JWT_ISSUER_ENV)
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let minutes = match get(JWT_EXPIRATION_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: JWT_EXPIRATION_ENV,
                    reason: format!("expected a positive number of minutes, got {raw:?}"),
                })?,
            None => DEFAULT_EXPIRATION_MINUTES,
        };

        let strict_issuer = match get(JWT_STRICT_ISSUER_ENV) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                key: JWT_STRICT_ISSUER_ENV,
                reason: format!("expected true/false, got {raw:?}"),
            })?,
            None => false,
        };

        let default_tenant = get(TENANT_DEFAULT_ENV)
            .and_then(|raw| TenantId::parse(&raw))
            .unwrap_or_else(|| TenantId::new(DEFAULT_TENANT));

        let log_format = get(LOG_FORMAT_ENV)
            .map(|raw| LogFormat::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            addr,
            profile,
            jwt: JwtConfig {
                secret,
                issuer,
                ttl: Duration::from_secs(minutes.saturating_mul(60)),
                strict_issuer,
            },
            default_tenant,
            log_format,
        })
    }
}

/// IPv4 or IPv6 literal (brackets optional), or `localhost`.
fn parse_host(raw: &str) -> Result<IpAddr, ConfigError> {
    let host = raw.trim();
    if host.eq_ignore_ascii_case("localhost") {
        return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    host.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
        key: HOST_ENV,
        reason: e.to_string(),
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = load(&[]).unwrap();
        assert_eq!(config.addr.port(), DEFAULT_PORT);
        assert!(!config.profile.is_dev());
        assert!(config.jwt.secret.is_none());
        assert_eq!(config.jwt.issuer, DEFAULT_ISSUER);
        assert_eq!(config.jwt.ttl, Duration::from_secs(120 * 60));
        assert!(!config.jwt.strict_issuer);
        assert_eq!(config.default_tenant.as_str(), "demo");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_all_jwt_settings() {
        let config = load(&[
            (JWT_SECRET_ENV, "0123456789abcdef0123456789abcdef"),
            (JWT_ISSUER_ENV, "condo-test"),
            (JWT_EXPIRATION_ENV, "15"),
            (JWT_STRICT_ISSUER_ENV, "true"),
            (PROFILE_ENV, "DEV"),
            (TENANT_DEFAULT_ENV, "  acme "),
            (LOG_FORMAT_ENV, "json"),
        ])
        .unwrap();

        assert!(config.jwt.secret.is_some());
        assert_eq!(config.jwt.issuer, "condo-test");
        assert_eq!(config.jwt.ttl, Duration::from_secs(15 * 60));
        assert!(config.jwt.strict_issuer);
        assert!(config.profile.is_dev());
        assert_eq!(config.default_tenant.as_str(), "acme");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn short_secret_aborts_startup() {
        let err = load(&[(JWT_SECRET_ENV, "too-short")]).unwrap_err();
        assert!(matches!(err, ConfigError::Secret { .. }));
    }

    #[test]
    fn rejects_zero_expiration() {
        let err = load(&[(JWT_EXPIRATION_ENV, "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: JWT_EXPIRATION_ENV,
                ..
            }
        ));
    }

    #[test]
    fn host_accepts_ipv6_and_localhost() {
        let config = load(&[(HOST_ENV, "::"), (PORT_ENV, "9000")]).unwrap();
        assert!(config.addr.is_ipv6());
        assert_eq!(config.addr.port(), 9000);

        let config = load(&[(HOST_ENV, "[::1]")]).unwrap();
        assert!(config.addr.ip().is_loopback());

        let config = load(&[(HOST_ENV, "localhost")]).unwrap();
        assert_eq!(config.addr.ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));

        let err = load(&[(HOST_ENV, "not a host")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: HOST_ENV, .. }));
    }

    #[test]
    fn rejects_garbage_port() {
        assert!(load(&[(PORT_ENV, "eighty")]).is_err());
    }

    #[test]
    fn jwt_config_debug_hides_secret() {
        let config = load(&[(JWT_SECRET_ENV, "0123456789abcdef0123456789abcdef")]).unwrap();
        let printed = format!("{:?}", config.jwt);
        assert!(!printed.contains("0123456789abcdef"));
        assert!(printed.contains("secret_configured: true"));
    }
}
