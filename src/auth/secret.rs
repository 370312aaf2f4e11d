// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing secret material.
//!
//! The configured value is either raw UTF-8 text or, when prefixed with
//! `base64:`, standard base64 that is decoded to the key bytes. HS256 needs at
//! least 32 bytes of key material.

use base64ct::{Base64, Encoding};
use jsonwebtoken::{DecodingKey, EncodingKey};

const BASE64_PREFIX: &str = "base64:";

/// Minimum key length for HMAC-SHA256.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("secret is empty")]
    Empty,

    #[error("secret is not valid base64")]
    InvalidBase64,

    #[error("secret is {0} bytes, at least {MIN_SECRET_BYTES} are required")]
    TooShort(usize),
}

/// HMAC key bytes, loaded once at startup.
#[derive(Clone)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Parse a configured secret value.
    ///
    /// Plain-text secrets are used byte for byte, surrounding whitespace
    /// included.
    pub fn parse(raw: &str) -> Result<Self, SecretError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SecretError::Empty);
        }

        let bytes = match trimmed.strip_prefix(BASE64_PREFIX) {
            Some(encoded) => {
                Base64::decode_vec(encoded.trim()).map_err(|_| SecretError::InvalidBase64)?
            }
            None => raw.as_bytes().to_vec(),
        };

        if bytes.len() < MIN_SECRET_BYTES {
            return Err(SecretError::TooShort(bytes.len()));
        }

        Ok(Self { bytes })
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.bytes)
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.bytes)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
