// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::HeaderName,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    blockchain::{
        BalanceReport, Environment, GasSponsorshipEstimate, NetworkStatus, TransferReceipt,
        WalletRecord,
    },
    state::AppState,
};

pub mod balance;
pub mod health;
pub mod networks;
pub mod transfers;
pub mod wallets;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/wallets", post(wallets::create_wallet))
        .route(
            "/wallets/{address}/balance",
            get(balance::get_wallet_balance),
        )
        .route("/transfers", post(transfers::send_token))
        .route("/transfers/estimate", post(transfers::estimate_transfer))
        .route("/native-transfers", post(transfers::send_native))
        .route("/networks/{environment}", get(networks::network_status))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .with_state(state);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/v1", v1_routes)
        .nest("/health", health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        wallets::create_wallet,
        balance::get_wallet_balance,
        transfers::send_token,
        transfers::estimate_transfer,
        transfers::send_native,
        networks::network_status,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Environment,
            WalletRecord,
            BalanceReport,
            GasSponsorshipEstimate,
            TransferReceipt,
            NetworkStatus,
            wallets::CreateWalletRequest,
            transfers::TokenTransferRequest,
            transfers::NativeTransferRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Wallets", description = "Wallet creation and balances"),
        (name = "Transfers", description = "Sponsored token and native transfers"),
        (name = "Networks", description = "Chain status per environment"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
