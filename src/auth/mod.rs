// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication and route authorization for the condo API.
//!
//! ## Request Flow
//!
//! 1. The tenant gate (see `crate::tenant`) binds the request to a tenant
//! 2. [`middleware::authenticate`] decodes `Authorization: Bearer <token>`
//!    (HS256, 60 second clock skew) and attaches an [`Identity`]
//! 3. [`matrix::authorize`] checks method + path + roles against the
//!    [`AuthorizationMatrix`]; unmatched routes are denied
//! 4. Handlers read the identity through the [`Auth`] extractor
//!
//! Tokens are minted by `POST /auth/login` after [`CredentialVerifier`]
//! checks the tenant-scoped email and bcrypt password hash.
//!
//! ## Security
//!
//! - The raw token and the submitted password are never logged
//! - A missing signing secret rejects every token with
//!   `X-Auth-Error: jwt_secret_not_configured`
//! - Unknown login emails cost the same bcrypt work as known ones

pub mod claims;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod matrix;
pub mod middleware;
pub mod roles;
pub mod secret;
pub mod token;

pub use claims::Identity;
pub use credentials::{Account, AccountLookup, CredentialVerifier, VerifiedAccount};
pub use error::{AuthError, AUTH_ERROR_HEADER};
pub use extractor::Auth;
pub use matrix::{AuthorizationMatrix, Decision};
pub use roles::Role;
pub use secret::{SecretError, SecretKey};
pub use token::{IssuedToken, TokenCodec, TokenError};
