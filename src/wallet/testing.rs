// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory [`ChainClient`] that records every call.

use std::sync::Mutex;

use alloy::{
    primitives::{Address, TxHash, U256},
    signers::local::PrivateKeySigner,
};

use crate::blockchain::{ChainClient, ChainClientError, GasPolicy, TransferReceipt};

pub const FUNDING_TX: TxHash = TxHash::repeat_byte(0xf0);
pub const TOKEN_TX: TxHash = TxHash::repeat_byte(0x70);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainCall {
    NativeBalance(Address),
    BlockNumber,
    ChainId,
    GasPrice,
    TokenName,
    TokenDecimals,
    TokenBalance(Address),
    EstimateTransferGas {
        from: Address,
        to: Address,
        amount: U256,
    },
    SendNative {
        from: Address,
        to: Address,
        value: U256,
        policy: GasPolicy,
    },
    SubmitTokenTransfer {
        from: Address,
        to: Address,
        amount: U256,
    },
    WaitForConfirmation(TxHash),
}

pub struct MockChainClient {
    calls: Mutex<Vec<ChainCall>>,
    pub token_name: String,
    pub decimals: u8,
    pub token_balance: U256,
    pub native_balance: U256,
    pub gas_units: u64,
    pub gas_price: Option<u128>,
    pub chain_id: u64,
    pub block_number: u64,
    pub revert_token_transfer: bool,
    pub revert_funding: bool,
    /// Name of the trait method that should fail with an RPC error.
    pub fail_on: Option<&'static str>,
}

impl Default for MockChainClient {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            token_name: "USD Coin".to_string(),
            decimals: 6,
            token_balance: U256::ZERO,
            native_balance: U256::ZERO,
            gas_units: 50_000,
            gas_price: Some(1_000_000_000),
            chain_id: 484,
            block_number: 1_000,
            revert_token_transfer: false,
            revert_funding: false,
            fail_on: None,
        }
    }
}

impl MockChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balances(mut self, token: U256, native: U256) -> Self {
        self.token_balance = token;
        self.native_balance = native;
        self
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_gas(mut self, units: u64, price: Option<u128>) -> Self {
        self.gas_units = units;
        self.gas_price = price;
        self
    }

    pub fn reverting_token_transfer(mut self) -> Self {
        self.revert_token_transfer = true;
        self
    }

    pub fn reverting_funding(mut self) -> Self {
        self.revert_funding = true;
        self
    }

    pub fn failing(mut self, method: &'static str) -> Self {
        self.fail_on = Some(method);
        self
    }

    pub fn calls(&self) -> Vec<ChainCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn funding_calls(&self) -> Vec<ChainCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, ChainCall::SendNative { .. }))
            .collect()
    }

    fn record(&self, method: &'static str, call: ChainCall) -> Result<(), ChainClientError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(method) {
            return Err(ChainClientError::RpcError(format!("{method} unavailable")));
        }
        Ok(())
    }
}

impl ChainClient for MockChainClient {
    async fn native_balance(&self, owner: Address) -> Result<U256, ChainClientError> {
        self.record("native_balance", ChainCall::NativeBalance(owner))?;
        Ok(self.native_balance)
    }

    async fn block_number(&self) -> Result<u64, ChainClientError> {
        self.record("block_number", ChainCall::BlockNumber)?;
        Ok(self.block_number)
    }

    async fn chain_id(&self) -> Result<u64, ChainClientError> {
        self.record("chain_id", ChainCall::ChainId)?;
        Ok(self.chain_id)
    }

    async fn gas_price(&self) -> Result<Option<u128>, ChainClientError> {
        self.record("gas_price", ChainCall::GasPrice)?;
        Ok(self.gas_price)
    }

    async fn token_name(&self) -> Result<String, ChainClientError> {
        self.record("token_name", ChainCall::TokenName)?;
        Ok(self.token_name.clone())
    }

    async fn token_decimals(&self) -> Result<u8, ChainClientError> {
        self.record("token_decimals", ChainCall::TokenDecimals)?;
        Ok(self.decimals)
    }

    async fn token_balance(&self, owner: Address) -> Result<U256, ChainClientError> {
        self.record("token_balance", ChainCall::TokenBalance(owner))?;
        Ok(self.token_balance)
    }

    async fn estimate_transfer_gas(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<u64, ChainClientError> {
        self.record(
            "estimate_transfer_gas",
            ChainCall::EstimateTransferGas { from, to, amount },
        )?;
        Ok(self.gas_units)
    }

    async fn send_native(
        &self,
        signer: &PrivateKeySigner,
        to: Address,
        value: U256,
        policy: GasPolicy,
    ) -> Result<TxHash, ChainClientError> {
        self.record(
            "send_native",
            ChainCall::SendNative {
                from: signer.address(),
                to,
                value,
                policy,
            },
        )?;
        Ok(FUNDING_TX)
    }

    async fn submit_token_transfer(
        &self,
        signer: &PrivateKeySigner,
        to: Address,
        amount: U256,
    ) -> Result<TxHash, ChainClientError> {
        self.record(
            "submit_token_transfer",
            ChainCall::SubmitTokenTransfer {
                from: signer.address(),
                to,
                amount,
            },
        )?;
        Ok(TOKEN_TX)
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TransferReceipt, ChainClientError> {
        self.record("wait_for_confirmation", ChainCall::WaitForConfirmation(tx_hash))?;
        let reverted = (tx_hash == TOKEN_TX && self.revert_token_transfer)
            || (tx_hash == FUNDING_TX && self.revert_funding);
        Ok(TransferReceipt {
            transaction_id: format!("{tx_hash:#x}"),
            confirmed: !reverted,
            block_number: Some(self.block_number + 1),
        })
    }
}
