// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Custodial wallet operations.
//!
//! [`WalletService`] is the entry point used by the HTTP layer. Every
//! operation takes the environment tag as given by the caller and rejects
//! unknown tags before touching the network.
//!
//! - `issuer` - key generation and sealing
//! - `balance` - token and native balance reads
//! - `transfer` - gas sponsorship and token transfers

pub mod balance;
pub mod error;
pub mod issuer;
pub mod transfer;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use uuid::Uuid;

use crate::blockchain::{
    with_deadline, BalanceReport, ChainClient, DecimalAmount, Environment, EnvironmentRegistry,
    GasSponsorshipEstimate, NetworkStatus, TransferReceipt, WalletRecord,
};
use crate::crypto::{EncryptedSecret, SecretCodec, TreasuryCredential};

pub use balance::BalanceReporter;
pub use error::{parse_address, WalletError, WalletResult};
pub use issuer::WalletIssuer;
pub use transfer::{TransferOrchestrator, TransferRequest, TransferStage};

/// Deadlines applied to chain calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Each read or submission
    pub rpc: Duration,
    /// Each wait for a transaction to be mined
    pub confirmation: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            rpc: Duration::from_secs(30),
            confirmation: Duration::from_secs(120),
        }
    }
}

/// Wallet operations over one chain client per environment.
pub struct WalletService<C> {
    registry: EnvironmentRegistry<C>,
    issuer: WalletIssuer,
    reporter: BalanceReporter,
    orchestrator: TransferOrchestrator,
    treasury_address: Address,
    timeouts: Timeouts,
}

impl<C: ChainClient> WalletService<C> {
    pub fn new(
        registry: EnvironmentRegistry<C>,
        codec: SecretCodec,
        treasury: TreasuryCredential,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            registry,
            issuer: WalletIssuer::new(codec.clone()),
            reporter: BalanceReporter::new(timeouts.rpc),
            treasury_address: treasury.address(),
            orchestrator: TransferOrchestrator::new(codec, treasury, timeouts),
            timeouts,
        }
    }

    pub fn treasury_address(&self) -> Address {
        self.treasury_address
    }

    /// Configured environments, sorted.
    pub fn environments(&self) -> Vec<Environment> {
        let mut environments: Vec<_> = self.registry.environments().collect();
        environments.sort_by_key(|e| e.as_str());
        environments
    }

    /// Parse an environment tag and check it is configured.
    pub fn environment(&self, tag: &str) -> WalletResult<Environment> {
        let environment: Environment = tag.parse()?;
        match self.registry.network(environment) {
            Some(_) => Ok(environment),
            None => Err(WalletError::UnsupportedEnvironment(tag.to_string())),
        }
    }

    async fn client(&self, environment: Environment) -> WalletResult<Arc<C>> {
        Ok(self.registry.resolve(environment).await?)
    }

    /// Generate a new wallet for `environment`.
    pub fn create_wallet(&self, environment: &str) -> WalletResult<WalletRecord> {
        let environment = self.environment(environment)?;
        let operation_id = Uuid::new_v4();

        let record = self.issuer.create_wallet()?;
        tracing::info!(
            %operation_id,
            %environment,
            address = %record.address,
            "Wallet created"
        );
        Ok(record)
    }

    /// Token and native balances of `address`.
    pub async fn get_balance(&self, address: &str, environment: &str) -> WalletResult<BalanceReport> {
        let environment = self.environment(environment)?;
        let owner = parse_address(address)?;
        let operation_id = Uuid::new_v4();

        let client = self.client(environment).await?;
        let report = self.reporter.report(client.as_ref(), owner).await;
        match &report {
            Ok(_) => tracing::debug!(%operation_id, %environment, %owner, "Balance read"),
            Err(e) => tracing::warn!(%operation_id, %environment, %owner, error = %e, "Balance read failed"),
        }
        report
    }

    /// Transfer tokens from the wallet sealed in `encrypted_secret`.
    pub async fn send_token(
        &self,
        encrypted_secret: &str,
        recipient: &str,
        amount: &str,
        environment: &str,
    ) -> WalletResult<TransferReceipt> {
        let environment = self.environment(environment)?;
        let request = TransferRequest::parse(encrypted_secret, recipient, amount)?;

        let client = self.client(environment).await?;
        self.orchestrator
            .send_token(client.as_ref(), environment, &request)
            .await
    }

    /// Native amount a [`WalletService::send_token`] with the same
    /// arguments would be sponsored with.
    pub async fn estimate_sponsorship(
        &self,
        encrypted_secret: &str,
        recipient: &str,
        amount: &str,
        environment: &str,
    ) -> WalletResult<GasSponsorshipEstimate> {
        let environment = self.environment(environment)?;
        let request = TransferRequest::parse(encrypted_secret, recipient, amount)?;

        let client = self.client(environment).await?;
        self.orchestrator
            .estimate_sponsorship(client.as_ref(), environment, &request)
            .await
    }

    /// Send native currency from the wallet sealed in `encrypted_secret`.
    pub async fn send_native(
        &self,
        encrypted_secret: &str,
        recipient: &str,
        amount: &str,
        environment: &str,
    ) -> WalletResult<TransferReceipt> {
        let environment = self.environment(environment)?;
        let amount = amount.trim().parse::<DecimalAmount>()?;
        let recipient = parse_address(recipient)?;
        let secret = EncryptedSecret::new(encrypted_secret);

        let client = self.client(environment).await?;
        self.orchestrator
            .send_native(client.as_ref(), environment, recipient, &amount, &secret)
            .await
    }

    /// Chain ID and head block of `environment`.
    pub async fn network_status(&self, environment: &str) -> WalletResult<NetworkStatus> {
        let environment = self.environment(environment)?;
        let operation_id = Uuid::new_v4();
        let client = self.client(environment).await?;

        let status = tokio::try_join!(
            with_deadline(self.timeouts.rpc, "chain id", client.chain_id()),
            with_deadline(self.timeouts.rpc, "block number", client.block_number()),
        )
        .map(|(chain_id, block_number)| NetworkStatus {
            environment,
            chain_id,
            block_number,
        })
        .map_err(WalletError::ChainQuery);

        match &status {
            Ok(s) => tracing::debug!(%operation_id, %environment, block_number = s.block_number, "Network status read"),
            Err(e) => tracing::warn!(%operation_id, %environment, error = %e, "Network status read failed"),
        }
        status
    }
}
