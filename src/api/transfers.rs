// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token and native transfer endpoints.
//!
//! Requests block until the transaction is mined or a deadline elapses.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    blockchain::{GasSponsorshipEstimate, TransferReceipt},
    error::ApiError,
    state::AppState,
};

/// Token transfer from a custodial wallet.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransferRequest {
    /// Encrypted secret returned at wallet creation
    pub encrypted_secret: String,
    /// Recipient address
    pub recipient: String,
    /// Amount in token units, e.g. `"1.5"`
    #[schema(example = "1.5")]
    pub amount: String,
    #[schema(example = "sandbox")]
    pub environment: String,
}

/// Native-currency transfer from a custodial wallet.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NativeTransferRequest {
    /// Encrypted secret of the sending wallet
    pub encrypted_secret: String,
    pub recipient: String,
    /// Amount in CAMP, e.g. `"0.01"`
    pub amount: String,
    pub environment: String,
}

/// Transfer tokens, sponsoring the sender's gas when needed.
#[utoipa::path(
    post,
    path = "/v1/transfers",
    tag = "Transfers",
    request_body = TokenTransferRequest,
    responses(
        (status = 200, description = "Transfer confirmed", body = TransferReceipt),
        (status = 400, description = "Invalid request or wallet secret"),
        (status = 422, description = "Insufficient funds"),
        (status = 503, description = "Sponsorship or transfer failed on chain")
    )
)]
pub async fn send_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenTransferRequest>, JsonRejection>,
) -> Result<Json<TransferReceipt>, ApiError> {
    let Json(request) = payload?;
    let receipt = state
        .wallets
        .send_token(
            &request.encrypted_secret,
            &request.recipient,
            &request.amount,
            &request.environment,
        )
        .await?;
    Ok(Json(receipt))
}

/// Estimate the gas sponsorship a token transfer would receive.
#[utoipa::path(
    post,
    path = "/v1/transfers/estimate",
    tag = "Transfers",
    request_body = TokenTransferRequest,
    responses(
        (status = 200, description = "Sponsorship estimate", body = GasSponsorshipEstimate),
        (status = 400, description = "Invalid request or wallet secret"),
        (status = 503, description = "Gas estimation failed")
    )
)]
pub async fn estimate_transfer(
    State(state): State<AppState>,
    payload: Result<Json<TokenTransferRequest>, JsonRejection>,
) -> Result<Json<GasSponsorshipEstimate>, ApiError> {
    let Json(request) = payload?;
    let estimate = state
        .wallets
        .estimate_sponsorship(
            &request.encrypted_secret,
            &request.recipient,
            &request.amount,
            &request.environment,
        )
        .await?;
    Ok(Json(estimate))
}

/// Send native currency with the fixed funding gas policy.
#[utoipa::path(
    post,
    path = "/v1/native-transfers",
    tag = "Transfers",
    request_body = NativeTransferRequest,
    responses(
        (status = 200, description = "Transfer confirmed", body = TransferReceipt),
        (status = 400, description = "Missing or invalid field, or wallet secret"),
        (status = 422, description = "Insufficient funds"),
        (status = 503, description = "Transfer failed on chain")
    )
)]
pub async fn send_native(
    State(state): State<AppState>,
    payload: Result<Json<NativeTransferRequest>, JsonRejection>,
) -> Result<Json<TransferReceipt>, ApiError> {
    let Json(request) = payload?;
    let receipt = state
        .wallets
        .send_native(
            &request.encrypted_secret,
            &request.recipient,
            &request.amount,
            &request.environment,
        )
        .await?;
    Ok(Json(receipt))
}
