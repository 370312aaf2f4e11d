// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Condo API - Tenant-isolated REST backend
//!
//! Every request is bound to one tenant and, where the route requires it, one
//! bearer-token identity before any handler runs.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Token codec, authentication gate, authorization matrix, login
//! - `tenant` - Tenant resolution, tenant gate and request-scoped context
//! - `store` - In-memory tenant-partitioned store
//! - `config` - Environment configuration
//! - `logging` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;
pub mod tenant;
