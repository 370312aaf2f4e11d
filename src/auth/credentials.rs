// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Email/password verification for the login endpoint.

use tokio::sync::RwLock;

use super::Role;
use crate::tenant::TenantId;

/// Plaintext compared against when no account matches, so unknown emails
/// cost the same bcrypt work as known ones.
const DUMMY_PASSWORD: &str = "no-account-matches-this-password";

/// A stored login account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub tenant: TenantId,
    /// Lower-cased, trimmed
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Source of accounts, scoped by tenant.
pub trait AccountLookup {
    /// `email` is already normalized.
    fn find_account(&self, tenant: &TenantId, email: &str) -> Option<Account>;
}

/// A successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccount {
    pub subject: String,
    pub role: Role,
    pub tenant: TenantId,
}

/// Normalized lookup key for an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// bcrypt-backed credential check.
#[derive(Clone)]
pub struct CredentialVerifier {
    cost: u32,
    dummy_hash: String,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

impl CredentialVerifier {
    /// Build a verifier hashing at `cost`. Computes the dummy hash up front.
    pub fn new(cost: u32) -> Result<Self, bcrypt::BcryptError> {
        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn hash_password(&self, password: &str) -> Result<String, bcrypt::BcryptError> {
        bcrypt::hash(password, self.cost)
    }

    /// Check `email`/`password` against the accounts of `tenant`.
    ///
    /// Without a tenant nothing is looked up. Every other path spends exactly
    /// one bcrypt comparison, on the blocking pool.
    pub async fn authenticate<L>(
        &self,
        accounts: &RwLock<L>,
        tenant: Option<&TenantId>,
        email: &str,
        password: &str,
    ) -> Option<VerifiedAccount>
    where
        L: AccountLookup,
    {
        let Some(tenant) = tenant else {
            tracing::debug!("login attempted without tenant");
            return None;
        };

        let email = normalize_email(email);
        let account = accounts.read().await.find_account(tenant, &email);

        let hash = account
            .as_ref()
            .map(|a| a.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.clone());
        let password = password.to_owned();

        let matched = match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
            Ok(Ok(matched)) => matched,
            Ok(Err(err)) => {
                tracing::warn!(tenant = %tenant, error = %err, "stored password hash is unusable");
                false
            }
            Err(err) => {
                tracing::error!(tenant = %tenant, error = %err, "password verification task failed");
                false
            }
        };

        match account {
            Some(account) if matched => Some(VerifiedAccount {
                subject: account.email,
                role: account.role,
                tenant: account.tenant,
            }),
            _ => {
                tracing::info!(tenant = %tenant, "login rejected");
                None
            }
        }
    }
}
