// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use condo_rust_server::{
    api::router,
    auth::CredentialVerifier,
    config::AppConfig,
    logging,
    state::AppState,
    store::{InMemoryStore, DEV_ADMIN_EMAIL},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    logging::init(config.log_format);

    tracing::info!(
        addr = %config.addr,
        profile = config.profile.as_str(),
        jwt = ?config.jwt,
        "configuration loaded"
    );
    if config.jwt.secret.is_none() {
        tracing::warn!("JWT_SECRET is not set; every bearer token and login will be rejected");
    }

    let credentials = CredentialVerifier::new(bcrypt::DEFAULT_COST)?;
    let mut store = InMemoryStore::new();
    if config.profile.is_dev() && store.seed_dev_admin(&config.default_tenant, &credentials)? {
        tracing::info!(
            tenant = %config.default_tenant,
            email = DEV_ADMIN_EMAIL,
            "seeded development admin account"
        );
    }

    let state = AppState::new(&config, store, credentials);
    let app = router(state);

    let listener = TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "condo API listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
