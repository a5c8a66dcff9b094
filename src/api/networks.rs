// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{blockchain::NetworkStatus, error::ApiError, state::AppState};

/// Chain ID and latest block of an environment.
#[utoipa::path(
    get,
    path = "/v1/networks/{environment}",
    tag = "Networks",
    params(("environment" = String, Path, description = "`production` or `sandbox`")),
    responses(
        (status = 200, description = "Network reachable", body = NetworkStatus),
        (status = 400, description = "Unsupported environment"),
        (status = 503, description = "Blockchain network unavailable")
    )
)]
pub async fn network_status(
    State(state): State<AppState>,
    Path(environment): Path<String>,
) -> Result<Json<NetworkStatus>, ApiError> {
    Ok(Json(state.wallets.network_status(&environment).await?))
}
