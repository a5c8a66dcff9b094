// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use relational_camp_wallet::{
    api::router,
    config::ServiceConfig,
    crypto::{EncryptedSecret, SecretCodec, TreasuryCredential},
    init_tracing,
    state::AppState,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let codec = SecretCodec::from_passphrase(&config.encryption_key);
    let treasury = TreasuryCredential::new(
        &codec,
        EncryptedSecret::new(config.treasury_secret.as_str()),
    )
    .map_err(|e| format!("{} does not decrypt: {e}", relational_camp_wallet::config::TREASURY_SECRET_ENV))?;

    tracing::info!(
        treasury = %treasury.address(),
        environments = config.networks.len(),
        rpc_timeout = ?config.timeouts.rpc,
        confirmation_timeout = ?config.timeouts.confirmation,
        "Configuration loaded"
    );

    let state = AppState::connect(
        config.networks.clone(),
        codec,
        treasury,
        config.timeouts,
        config.confirmation_poll,
    );
    let app = router(state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Relational Camp Wallet listening (docs at /docs)"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
