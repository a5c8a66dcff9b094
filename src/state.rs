// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::{EnvironmentRegistry, EvmClient, NetworkConfig};
use crate::crypto::{SecretCodec, TreasuryCredential};
use crate::wallet::{Timeouts, WalletService};

#[derive(Clone)]
pub struct AppState {
    pub wallets: Arc<WalletService<EvmClient>>,
}

impl AppState {
    pub fn new(wallets: WalletService<EvmClient>) -> Self {
        Self {
            wallets: Arc::new(wallets),
        }
    }

    /// State backed by alloy clients for `networks`. No connection is made
    /// until an environment is first used.
    pub fn connect(
        networks: Vec<NetworkConfig>,
        codec: SecretCodec,
        treasury: TreasuryCredential,
        timeouts: Timeouts,
        poll_interval: Duration,
    ) -> Self {
        let registry = EnvironmentRegistry::new(networks, move |network: &NetworkConfig| {
            EvmClient::new(network.clone())
                .map(|client| client.with_poll_interval(poll_interval))
        });
        Self::new(WalletService::new(registry, codec, treasury, timeouts))
    }
}
