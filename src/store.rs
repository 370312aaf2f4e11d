// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory, tenant-partitioned store for accounts, condominiums and units.
//!
//! Every read and write takes the caller's [`TenantId`]; a record belonging
//! to another tenant is indistinguishable from a missing one.

use std::collections::BTreeMap;

use crate::auth::credentials::{normalize_email, Account, AccountLookup, CredentialVerifier};
use crate::auth::Role;
use crate::error::ApiError;
use crate::models::{
    Condominium, CreateCondominiumRequest, CreateUnitRequest, Unit, UpdateUnitRequest,
};
use crate::tenant::TenantId;

/// Seeded login for local development.
pub const DEV_ADMIN_EMAIL: &str = "admin@demo.com";
pub const DEV_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
struct Scoped<T> {
    tenant: TenantId,
    record: T,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: Vec<Account>,
    condominiums: BTreeMap<u64, Scoped<Condominium>>,
    units: BTreeMap<u64, Scoped<Unit>>,
    next_id: u64,
}

/// Trimmed unit number.
fn clean_number(number: &str) -> String {
    number.trim().to_string()
}

/// Trimmed block; blank collapses to `None`.
fn clean_block(block: Option<&str>) -> Option<String> {
    block
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    /// Add or replace the account for `(tenant, email)`.
    pub fn upsert_account(&mut self, mut account: Account) {
        account.email = normalize_email(&account.email);
        self.accounts
            .retain(|a| !(a.tenant == account.tenant && a.email == account.email));
        self.accounts.push(account);
    }

    /// Create the development admin account in `tenant` unless it exists.
    pub fn seed_dev_admin(
        &mut self,
        tenant: &TenantId,
        verifier: &CredentialVerifier,
    ) -> Result<bool, bcrypt::BcryptError> {
        if self.find_account(tenant, DEV_ADMIN_EMAIL).is_some() {
            return Ok(false);
        }
        self.upsert_account(Account {
            tenant: tenant.clone(),
            email: DEV_ADMIN_EMAIL.to_string(),
            password_hash: verifier.hash_password(DEV_ADMIN_PASSWORD)?,
            role: Role::ADMIN,
        });
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Condominiums
    // -------------------------------------------------------------------------

    pub fn list_condominiums(&self, tenant: &TenantId) -> Vec<Condominium> {
        self.condominiums
            .values()
            .filter(|c| &c.tenant == tenant)
            .map(|c| c.record.clone())
            .collect()
    }

    pub fn condominium(&self, tenant: &TenantId, id: u64) -> Option<&Condominium> {
        self.condominiums
            .get(&id)
            .filter(|c| &c.tenant == tenant)
            .map(|c| &c.record)
    }

    pub fn create_condominium(
        &mut self,
        tenant: &TenantId,
        request: CreateCondominiumRequest,
    ) -> Result<Condominium, ApiError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ApiError::bad_request("name_required"));
        }
        let id = self.allocate_id();
        let condominium = Condominium {
            id,
            name: name.to_string(),
        };
        self.condominiums.insert(
            id,
            Scoped {
                tenant: tenant.clone(),
                record: condominium.clone(),
            },
        );
        Ok(condominium)
    }

    // -------------------------------------------------------------------------
    // Units
    // -------------------------------------------------------------------------

    pub fn list_units(&self, tenant: &TenantId, condo_id: Option<u64>) -> Vec<Unit> {
        self.units
            .values()
            .filter(|u| &u.tenant == tenant)
            .filter(|u| condo_id.is_none_or(|id| u.record.condo_id == id))
            .map(|u| u.record.clone())
            .collect()
    }

    /// Whether another unit of the condominium already uses `number`/`block`.
    ///
    /// Number and block compare case-insensitively; `None` only matches
    /// `None`.
    fn is_duplicate(
        &self,
        tenant: &TenantId,
        condo_id: u64,
        number: &str,
        block: Option<&str>,
        ignore_id: Option<u64>,
    ) -> bool {
        let number = number.to_lowercase();
        let block = block.map(str::to_lowercase);
        self.units.values().any(|u| {
            &u.tenant == tenant
                && u.record.condo_id == condo_id
                && Some(u.record.id) != ignore_id
                && u.record.number.to_lowercase() == number
                && u.record.block.as_deref().map(str::to_lowercase) == block
        })
    }

    pub fn create_unit(
        &mut self,
        tenant: &TenantId,
        request: CreateUnitRequest,
    ) -> Result<Unit, ApiError> {
        if self.condominium(tenant, request.condo_id).is_none() {
            return Err(ApiError::not_found("condominium_not_found"));
        }

        let number = clean_number(&request.number);
        if number.is_empty() {
            return Err(ApiError::bad_request("number_required"));
        }
        let block = clean_block(request.block.as_deref());

        if self.is_duplicate(tenant, request.condo_id, &number, block.as_deref(), None) {
            return Err(ApiError::conflict("duplicate_unit"));
        }

        let id = self.allocate_id();
        let unit = Unit {
            id,
            condo_id: request.condo_id,
            number,
            block,
        };
        self.units.insert(
            id,
            Scoped {
                tenant: tenant.clone(),
                record: unit.clone(),
            },
        );
        Ok(unit)
    }

    pub fn update_unit(
        &mut self,
        tenant: &TenantId,
        unit_id: u64,
        request: UpdateUnitRequest,
    ) -> Result<Unit, ApiError> {
        let condo_id = self
            .units
            .get(&unit_id)
            .filter(|u| &u.tenant == tenant)
            .map(|u| u.record.condo_id)
            .ok_or_else(|| ApiError::not_found("unit_not_found"))?;

        let number = clean_number(&request.number);
        if number.is_empty() {
            return Err(ApiError::bad_request("number_required"));
        }
        let block = clean_block(request.block.as_deref());

        if self.is_duplicate(tenant, condo_id, &number, block.as_deref(), Some(unit_id)) {
            return Err(ApiError::conflict("duplicate_unit"));
        }

        let scoped = self
            .units
            .get_mut(&unit_id)
            .ok_or_else(|| ApiError::not_found("unit_not_found"))?;
        scoped.record.number = number;
        scoped.record.block = block;
        Ok(scoped.record.clone())
    }

    pub fn delete_unit(&mut self, tenant: &TenantId, unit_id: u64) -> Result<(), ApiError> {
        match self.units.get(&unit_id) {
            Some(u) if &u.tenant == tenant => {
                self.units.remove(&unit_id);
                Ok(())
            }
            _ => Err(ApiError::not_found("unit_not_found")),
        }
    }
}

impl AccountLookup for InMemoryStore {
    fn find_account(&self, tenant: &TenantId, email: &str) -> Option<Account> {
        self.accounts
            .iter()
            .find(|a| &a.tenant == tenant && a.email == email)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn demo() -> TenantId {
        TenantId::new("demo")
    }

    fn store_with_condo() -> (InMemoryStore, u64) {
        let mut store = InMemoryStore::new();
        let condo = store
            .create_condominium(
                &demo(),
                CreateCondominiumRequest {
                    name: " Sunset Towers ".into(),
                },
            )
            .unwrap();
        (store, condo.id)
    }

    fn unit(condo_id: u64, number: &str, block: Option<&str>) -> CreateUnitRequest {
        CreateUnitRequest {
            condo_id,
            number: number.into(),
            block: block.map(Into::into),
        }
    }

    #[test]
    fn condominiums_are_tenant_scoped() {
        let (store, id) = store_with_condo();
        assert_eq!(store.list_condominiums(&demo())[0].name, "Sunset Towers");
        assert!(store.list_condominiums(&TenantId::new("acme")).is_empty());
        assert!(store.condominium(&TenantId::new("acme"), id).is_none());
    }

    #[test]
    fn blank_condominium_name_is_rejected() {
        let mut store = InMemoryStore::new();
        let err = store
            .create_condominium(&demo(), CreateCondominiumRequest { name: "  ".into() })
            .unwrap_err();
        assert_eq!(err.code, "name_required");
    }

    #[test]
    fn unit_in_foreign_condominium_is_not_found() {
        let (mut store, id) = store_with_condo();
        let err = store
            .create_unit(&TenantId::new("acme"), unit(id, "101", None))
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "condominium_not_found");
    }

    #[test]
    fn blank_number_is_rejected() {
        let (mut store, id) = store_with_condo();
        let err = store.create_unit(&demo(), unit(id, "   ", None)).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "number_required");
    }

    #[test]
    fn duplicate_ignores_case_and_whitespace() {
        let (mut store, id) = store_with_condo();
        store.create_unit(&demo(), unit(id, "101A", Some("North"))).unwrap();

        let err = store
            .create_unit(&demo(), unit(id, " 101a ", Some(" north ")))
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, "duplicate_unit");
    }

    #[test]
    fn blank_and_absent_block_are_the_same() {
        let (mut store, id) = store_with_condo();
        let first = store.create_unit(&demo(), unit(id, "101", Some("  "))).unwrap();
        assert_eq!(first.block, None);

        let err = store.create_unit(&demo(), unit(id, "101", None)).unwrap_err();
        assert_eq!(err.code, "duplicate_unit");

        // A real block is a different unit.
        assert!(store.create_unit(&demo(), unit(id, "101", Some("B"))).is_ok());
    }

    #[test]
    fn same_unit_in_other_tenant_is_allowed() {
        let (mut store, id) = store_with_condo();
        store.create_unit(&demo(), unit(id, "101", None)).unwrap();

        let acme = TenantId::new("acme");
        let other = store
            .create_condominium(&acme, CreateCondominiumRequest { name: "Other".into() })
            .unwrap();
        assert!(store.create_unit(&acme, unit(other.id, "101", None)).is_ok());
        assert_eq!(store.list_units(&demo(), None).len(), 1);
        assert_eq!(store.list_units(&acme, Some(other.id)).len(), 1);
        assert!(store.list_units(&acme, Some(id)).is_empty());
    }

    #[test]
    fn update_checks_duplicates_except_self() {
        let (mut store, id) = store_with_condo();
        let a = store.create_unit(&demo(), unit(id, "101", None)).unwrap();
        let b = store.create_unit(&demo(), unit(id, "102", None)).unwrap();

        let same = store
            .update_unit(
                &demo(),
                a.id,
                UpdateUnitRequest {
                    number: "101".into(),
                    block: Some("".into()),
                },
            )
            .unwrap();
        assert_eq!(same.number, "101");

        let err = store
            .update_unit(
                &demo(),
                b.id,
                UpdateUnitRequest {
                    number: "101".into(),
                    block: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.code, "duplicate_unit");
    }

    #[test]
    fn update_and_delete_outside_tenant_are_not_found() {
        let (mut store, id) = store_with_condo();
        let a = store.create_unit(&demo(), unit(id, "101", None)).unwrap();
        let acme = TenantId::new("acme");

        let err = store
            .update_unit(
                &acme,
                a.id,
                UpdateUnitRequest {
                    number: "1".into(),
                    block: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.code, "unit_not_found");
        assert_eq!(store.delete_unit(&acme, a.id).unwrap_err().code, "unit_not_found");

        store.delete_unit(&demo(), a.id).unwrap();
        assert!(store.list_units(&demo(), None).is_empty());
    }

    #[test]
    fn dev_seed_is_idempotent() {
        let verifier = CredentialVerifier::new(4).unwrap();
        let mut store = InMemoryStore::new();

        assert!(store.seed_dev_admin(&demo(), &verifier).unwrap());
        assert!(!store.seed_dev_admin(&demo(), &verifier).unwrap());

        let account = store.find_account(&demo(), DEV_ADMIN_EMAIL).unwrap();
        assert_eq!(account.role, Role::ADMIN);
        assert!(bcrypt::verify(DEV_ADMIN_PASSWORD, &account.password_hash).unwrap());
        assert!(store.find_account(&TenantId::new("acme"), DEV_ADMIN_EMAIL).is_none());
    }

    #[test]
    fn upsert_normalizes_email() {
        let mut store = InMemoryStore::new();
        store.upsert_account(Account {
            tenant: demo(),
            email: " Jane@Demo.com ".into(),
            password_hash: "x".into(),
            role: Role::RESIDENT,
        });
        assert!(store.find_account(&demo(), "jane@demo.com").is_some());
    }
}
