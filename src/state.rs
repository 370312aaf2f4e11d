// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::auth::{AuthorizationMatrix, CredentialVerifier, TokenCodec};
use crate::config::{AppConfig, Profile};
use crate::store::InMemoryStore;
use crate::tenant::{TenantId, TenantResolver};

/// Shared application state.
///
/// Everything except the store is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub tokens: Arc<TokenCodec>,
    pub tenants: Arc<TenantResolver>,
    pub matrix: Arc<AuthorizationMatrix>,
    pub credentials: Arc<CredentialVerifier>,
    /// Issuer written into minted tokens
    pub issuer: Arc<str>,
    pub token_ttl: Duration,
}

impl AppState {
    pub fn new(config: &AppConfig, store: InMemoryStore, credentials: CredentialVerifier) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tokens: Arc::new(TokenCodec::from_config(&config.jwt)),
            tenants: Arc::new(TenantResolver::new(
                config.default_tenant.clone(),
                config.profile.clone(),
            )),
            matrix: Arc::new(AuthorizationMatrix::standard()),
            credentials: Arc::new(credentials),
            issuer: Arc::from(config.jwt.issuer.as_str()),
            token_ttl: config.jwt.ttl,
        }
    }

    /// Replace the token codec.
    pub fn with_tokens(mut self, tokens: TokenCodec) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    /// Replace the tenant resolver settings.
    pub fn with_tenancy(mut self, default_tenant: TenantId, profile: Profile) -> Self {
        self.tenants = Arc::new(TenantResolver::new(default_tenant, profile));
        self
    }

    /// Configured signing secret, `test` profile, minimum bcrypt cost.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            crate::config::JWT_SECRET_ENV => {
                Some("test-secret-that-is-long-enough-for-hs256".to_string())
            }
            crate::config::PROFILE_ENV => Some("test".to_string()),
            _ => None,
        })
        .unwrap();
        Self::new(&config, InMemoryStore::new(), CredentialVerifier::new(4).unwrap())
    }
}
