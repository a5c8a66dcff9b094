// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token contract interactions.

use alloy::{
    primitives::{Address, TxHash, U256},
    providers::Provider,
    sol,
};

use super::client::ChainClientError;

// Define the ERC-20 interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// ERC-20 contract wrapper.
pub struct Erc20Contract<P> {
    contract: IERC20::IERC20Instance<P>,
}

impl<P: Provider> Erc20Contract<P> {
    /// Bind the token at `address` to a provider.
    pub fn new(provider: P, address: Address) -> Self {
        Self {
            contract: IERC20::new(address, provider),
        }
    }

    /// Get the token name.
    pub async fn name(&self) -> Result<String, ChainClientError> {
        self.contract
            .name()
            .call()
            .await
            .map_err(|e| ChainClientError::ContractError(format!("name() failed: {e}")))
    }

    /// Get the token decimals.
    pub async fn decimals(&self) -> Result<u8, ChainClientError> {
        self.contract
            .decimals()
            .call()
            .await
            .map_err(|e| ChainClientError::ContractError(format!("decimals() failed: {e}")))
    }

    /// Get the raw balance of an address.
    pub async fn balance_of(&self, owner: Address) -> Result<U256, ChainClientError> {
        self.contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| ChainClientError::ContractError(format!("balanceOf() failed: {e}")))
    }

    /// Estimate gas units for `transfer(to, amount)` sent by `from`.
    pub async fn estimate_transfer(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<u64, ChainClientError> {
        self.contract
            .transfer(to, amount)
            .from(from)
            .estimate_gas()
            .await
            .map_err(|e| ChainClientError::RpcError(format!("transfer gas estimation failed: {e}")))
    }

    /// Submit `transfer(to, amount)`; the provider must carry the sender's wallet.
    pub async fn transfer(&self, to: Address, amount: U256) -> Result<TxHash, ChainClientError> {
        let pending = self
            .contract
            .transfer(to, amount)
            .send()
            .await
            .map_err(|e| ChainClientError::TransactionFailed(format!("Failed to send: {e}")))?;

        Ok(*pending.tx_hash())
    }
}
