// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Camp chain client for blockchain interactions.
//!
//! [`ChainClient`] is the seam the wallet operations are written against;
//! [`EvmClient`] implements it over an alloy HTTP provider and the
//! environment's ERC-20 contract.

use std::future::Future;
use std::time::Duration;

use alloy::{
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, TxHash, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};

use super::erc20::Erc20Contract;
use super::types::{GasPolicy, NetworkConfig, TransferReceipt};

/// HTTP provider type for Camp (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Default interval between receipt polls while waiting for mining.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Chain primitives used by the wallet operations.
///
/// Amounts are always in smallest units. Implementations perform a single
/// attempt per call; retries and deadlines are the caller's concern.
pub trait ChainClient: Send + Sync + 'static {
    /// Native balance of `owner` in wei.
    fn native_balance(
        &self,
        owner: Address,
    ) -> impl Future<Output = Result<U256, ChainClientError>> + Send;

    /// Current block height.
    fn block_number(&self) -> impl Future<Output = Result<u64, ChainClientError>> + Send;

    /// Chain ID reported by the endpoint.
    fn chain_id(&self) -> impl Future<Output = Result<u64, ChainClientError>> + Send;

    /// Current gas price, `None` when the endpoint cannot provide one.
    fn gas_price(&self) -> impl Future<Output = Result<Option<u128>, ChainClientError>> + Send;

    /// Token name from the contract.
    fn token_name(&self) -> impl Future<Output = Result<String, ChainClientError>> + Send;

    /// Token decimal precision from the contract.
    fn token_decimals(&self) -> impl Future<Output = Result<u8, ChainClientError>> + Send;

    /// Raw token balance of `owner`.
    fn token_balance(
        &self,
        owner: Address,
    ) -> impl Future<Output = Result<U256, ChainClientError>> + Send;

    /// Gas units a token `transfer(to, amount)` from `from` would consume.
    fn estimate_transfer_gas(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> impl Future<Output = Result<u64, ChainClientError>> + Send;

    /// Sign and submit a native-currency transfer with an explicit gas policy.
    fn send_native(
        &self,
        signer: &PrivateKeySigner,
        to: Address,
        value: U256,
        policy: GasPolicy,
    ) -> impl Future<Output = Result<TxHash, ChainClientError>> + Send;

    /// Sign and submit a token `transfer(to, amount)`.
    fn submit_token_transfer(
        &self,
        signer: &PrivateKeySigner,
        to: Address,
        amount: U256,
    ) -> impl Future<Output = Result<TxHash, ChainClientError>> + Send;

    /// Wait until `tx_hash` is mined and return its receipt.
    ///
    /// Returns a receipt with `confirmed == false` for reverted transactions.
    fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = Result<TransferReceipt, ChainClientError>> + Send;
}

/// Camp chain client backed by alloy.
pub struct EvmClient {
    /// Network configuration
    network: NetworkConfig,
    /// Parsed RPC endpoint, reused for signing providers
    url: url::Url,
    /// Alloy HTTP provider
    provider: HttpProvider,
    /// Token contract bound to the read-only provider
    token: Erc20Contract<HttpProvider>,
    poll_interval: Duration,
}

impl EvmClient {
    /// Create a new client for the specified network.
    ///
    /// No request is issued until the first call.
    pub fn new(network: NetworkConfig) -> Result<Self, ChainClientError> {
        let url: url::Url = network.rpc_url.parse().map_err(|e: url::ParseError| {
            ChainClientError::InvalidRpcUrl(e.to_string())
        })?;

        let provider = ProviderBuilder::new().connect_http(url.clone());
        let token = Erc20Contract::new(provider.clone(), network.token_address);

        Ok(Self {
            network,
            url,
            provider,
            token,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Override the receipt polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Provider that signs with `signer`.
    fn signing_provider(&self, signer: &PrivateKeySigner) -> impl Provider + Clone {
        ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(self.url.clone())
    }
}

impl ChainClient for EvmClient {
    async fn native_balance(&self, owner: Address) -> Result<U256, ChainClientError> {
        self.provider
            .get_balance(owner)
            .await
            .map_err(|e| ChainClientError::RpcError(format!("get_balance failed: {e}")))
    }

    async fn block_number(&self) -> Result<u64, ChainClientError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainClientError::RpcError(format!("get_block_number failed: {e}")))
    }

    async fn chain_id(&self) -> Result<u64, ChainClientError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ChainClientError::RpcError(format!("get_chain_id failed: {e}")))
    }

    async fn gas_price(&self) -> Result<Option<u128>, ChainClientError> {
        // A failing eth_gasPrice means "no fee data", not a hard error.
        match self.provider.get_gas_price().await {
            Ok(price) => Ok(Some(price)),
            Err(e) => {
                tracing::warn!(
                    environment = %self.network.environment,
                    error = %e,
                    "Gas price unavailable"
                );
                Ok(None)
            }
        }
    }

    async fn token_name(&self) -> Result<String, ChainClientError> {
        self.token.name().await
    }

    async fn token_decimals(&self) -> Result<u8, ChainClientError> {
        self.token.decimals().await
    }

    async fn token_balance(&self, owner: Address) -> Result<U256, ChainClientError> {
        self.token.balance_of(owner).await
    }

    async fn estimate_transfer_gas(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<u64, ChainClientError> {
        self.token.estimate_transfer(from, to, amount).await
    }

    async fn send_native(
        &self,
        signer: &PrivateKeySigner,
        to: Address,
        value: U256,
        policy: GasPolicy,
    ) -> Result<TxHash, ChainClientError> {
        let provider = self.signing_provider(signer);

        let tx = TransactionRequest::default()
            .with_to(to)
            .with_value(value)
            .with_gas_limit(policy.gas_limit)
            .with_gas_price(policy.gas_price_wei);

        let pending = provider.send_transaction(tx).await.map_err(|e| {
            ChainClientError::TransactionFailed(format!("Failed to send: {e}"))
        })?;

        Ok(*pending.tx_hash())
    }

    async fn submit_token_transfer(
        &self,
        signer: &PrivateKeySigner,
        to: Address,
        amount: U256,
    ) -> Result<TxHash, ChainClientError> {
        let contract = Erc20Contract::new(self.signing_provider(signer), self.network.token_address);
        contract.transfer(to, amount).await
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TransferReceipt, ChainClientError> {
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| ChainClientError::RpcError(format!("Failed to get receipt: {e}")))?;

            if let Some(receipt) = receipt {
                return Ok(TransferReceipt {
                    transaction_id: format!("{tx_hash:#x}"),
                    confirmed: receipt.status(),
                    block_number: receipt.block_number,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Run a chain call with a deadline.
///
/// Dropping the inner future on expiry cancels the local wait only; a
/// transaction that was already broadcast stays wherever the chain has it.
pub async fn with_deadline<T, F>(
    limit: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, ChainClientError>
where
    F: Future<Output = Result<T, ChainClientError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ChainClientError::Timeout {
            operation,
            after: limit,
        }),
    }
}

/// Create a signer from a hex-encoded private key (with or without 0x).
pub fn create_signer(private_key_hex: &str) -> Result<PrivateKeySigner, ChainClientError> {
    let key_bytes = alloy::hex::decode(private_key_hex)
        .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}
