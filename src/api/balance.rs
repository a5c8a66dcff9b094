// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain balance query endpoint.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{blockchain::BalanceReport, error::ApiError, state::AppState};

/// Query parameters for balance request.
#[derive(Debug, Deserialize, IntoParams)]
pub struct BalanceQuery {
    /// Environment to query (`production` or `sandbox`)
    pub environment: String,
}

/// Get the token and native balances of an address.
#[utoipa::path(
    get,
    path = "/v1/wallets/{address}/balance",
    tag = "Wallets",
    params(
        ("address" = String, Path, description = "0x-prefixed wallet address"),
        BalanceQuery
    ),
    responses(
        (status = 200, description = "Balance retrieved successfully", body = BalanceReport),
        (status = 400, description = "Invalid address or environment"),
        (status = 503, description = "Blockchain network unavailable")
    )
)]
pub async fn get_wallet_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceReport>, ApiError> {
    let report = state
        .wallets
        .get_balance(&address, &query.environment)
        .await?;
    Ok(Json(report))
}
