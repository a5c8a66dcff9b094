// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet creation endpoint.
//!
//! The sealed secret is returned to the caller and not kept by the
//! service.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{blockchain::WalletRecord, error::ApiError, state::AppState};

/// Request to create a new wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    /// Target environment (`production` or `sandbox`)
    #[schema(example = "sandbox")]
    pub environment: String,
}

/// Create a new wallet.
///
/// Generates a secp256k1 key pair and returns its address together with
/// the encrypted key material.
#[utoipa::path(
    post,
    path = "/v1/wallets",
    tag = "Wallets",
    request_body = CreateWalletRequest,
    responses(
        (status = 201, description = "Wallet created successfully", body = WalletRecord),
        (status = 400, description = "Unsupported environment"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    Json(request): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<WalletRecord>), ApiError> {
    let record = state.wallets.create_wallet(&request.environment)?;
    Ok((StatusCode::CREATED, Json(record)))
}
