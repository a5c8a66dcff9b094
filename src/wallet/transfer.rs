// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sponsored token transfers.
//!
//! ```text
//! Init → (MaybeSponsor) → TokenTransfer → Confirmed
//!   └──────────┴───────────────┴──────────→ Failed
//! ```
//!
//! A sender other than the treasury is assumed to hold no native currency.
//! The treasury first sends it the estimated gas cost of the token transfer
//! and that funding must be mined before the transfer is submitted. A
//! failure after funding does not reclaim the funds.

use std::fmt;

use alloy::{
    primitives::{Address, U256},
    signers::local::PrivateKeySigner,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::{
    format_units, with_deadline, ChainClient, ChainClientError, DecimalAmount, Environment,
    GasPolicy, GasSponsorshipEstimate, TransferReceipt, NATIVE_DECIMALS, NATIVE_SYMBOL,
};
use crate::crypto::{EncryptedSecret, KeyMaterial, SecretCodec, SenderRole, TreasuryCredential};

use super::error::{parse_address, WalletError, WalletResult};
use super::Timeouts;

/// Stage of a transfer, as it appears in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStage {
    Init,
    MaybeSponsor,
    TokenTransfer,
    Confirmed,
    Failed,
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferStage::Init => "init",
            TransferStage::MaybeSponsor => "maybe_sponsor",
            TransferStage::TokenTransfer => "token_transfer",
            TransferStage::Confirmed => "confirmed",
            TransferStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Validated input of a token transfer.
///
/// Built without any network access, so malformed requests never reach
/// the chain.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub secret: EncryptedSecret,
    pub recipient: Address,
    pub amount: DecimalAmount,
}

impl TransferRequest {
    pub fn parse(secret: &str, recipient: &str, amount: &str) -> WalletResult<Self> {
        let amount = amount.trim().parse::<DecimalAmount>()?;
        let recipient = parse_address(recipient)?;
        Ok(Self {
            secret: EncryptedSecret::new(secret),
            recipient,
            amount,
        })
    }
}

/// Decrypted sender of a transfer.
struct Sender {
    signer: PrivateKeySigner,
    role: SenderRole,
}

/// Runs the sponsorship and transfer sequence against one chain client.
#[derive(Debug, Clone)]
pub struct TransferOrchestrator {
    codec: SecretCodec,
    treasury: TreasuryCredential,
    timeouts: Timeouts,
}

impl TransferOrchestrator {
    pub fn new(codec: SecretCodec, treasury: TreasuryCredential, timeouts: Timeouts) -> Self {
        Self {
            codec,
            treasury,
            timeouts,
        }
    }

    /// Move `request.amount` tokens from the sender to the recipient,
    /// sponsoring the sender's gas first when needed.
    pub async fn send_token<C: ChainClient>(
        &self,
        client: &C,
        environment: Environment,
        request: &TransferRequest,
    ) -> WalletResult<TransferReceipt> {
        let operation_id = Uuid::new_v4();
        let span = tracing::info_span!("send_token", %operation_id, %environment);

        async {
            let result = self.run(client, request).await;
            if let Err(e) = &result {
                tracing::warn!(stage = %TransferStage::Failed, error = %e, "Token transfer aborted");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run<C: ChainClient>(&self, client: &C, request: &TransferRequest) -> WalletResult<TransferReceipt> {
        tracing::info!(stage = %TransferStage::Init, "Opening sender secret");
        let sender = self.open_sender(&request.secret)?;
        let sender_address = sender.signer.address();

        match sender.role {
            SenderRole::Treasury => {
                tracing::info!(
                    stage = %TransferStage::MaybeSponsor,
                    "Treasury sender, sponsorship skipped"
                );
            }
            SenderRole::User => {
                tracing::info!(
                    stage = %TransferStage::MaybeSponsor,
                    sender = %sender_address,
                    "Sponsoring sender gas"
                );
                let cost = self.estimate_cost(client, sender_address, request).await?;
                let funding = self.fund(client, sender_address, cost).await?;
                tracing::info!(
                    stage = %TransferStage::MaybeSponsor,
                    tx_hash = %funding.transaction_id,
                    "Sponsorship confirmed"
                );
            }
        }

        let decimals = self
            .rpc("token decimals", client.token_decimals())
            .await
            .map_err(WalletError::ChainQuery)?;
        let amount = request.amount.to_smallest_unit(decimals)?;

        let tx_hash = self
            .rpc(
                "token transfer",
                client.submit_token_transfer(&sender.signer, request.recipient, amount),
            )
            .await
            .map_err(WalletError::Transfer)?;
        tracing::info!(
            stage = %TransferStage::TokenTransfer,
            tx_hash = %tx_hash,
            recipient = %request.recipient,
            "Token transfer submitted"
        );

        let receipt = self
            .confirm("token transfer confirmation", client.wait_for_confirmation(tx_hash))
            .await
            .map_err(WalletError::Transfer)?;
        if !receipt.confirmed {
            return Err(WalletError::Transfer(ChainClientError::Reverted {
                tx_hash: receipt.transaction_id,
            }));
        }

        tracing::info!(
            stage = %TransferStage::Confirmed,
            tx_hash = %receipt.transaction_id,
            block_number = ?receipt.block_number,
            "Token transfer confirmed"
        );
        Ok(receipt)
    }

    /// Native amount the treasury would send before this transfer.
    pub async fn estimate_sponsorship<C: ChainClient>(
        &self,
        client: &C,
        environment: Environment,
        request: &TransferRequest,
    ) -> WalletResult<GasSponsorshipEstimate> {
        let operation_id = Uuid::new_v4();
        let span = tracing::info_span!("estimate_sponsorship", %operation_id, %environment);

        async {
            let result = self.estimate(client, request).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "Sponsorship estimate failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn estimate<C: ChainClient>(
        &self,
        client: &C,
        request: &TransferRequest,
    ) -> WalletResult<GasSponsorshipEstimate> {
        let sender = self.open_sender(&request.secret)?;
        let cost = self.estimate_cost(client, sender.signer.address(), request).await?;
        tracing::debug!(sender = %sender.signer.address(), "Sponsorship estimated");

        Ok(GasSponsorshipEstimate {
            native_amount: format_units(cost, NATIVE_DECIMALS),
            native_symbol: NATIVE_SYMBOL.to_string(),
        })
    }

    /// Send native currency from the wallet sealed in `secret`, with the
    /// fixed funding gas policy.
    pub async fn send_native<C: ChainClient>(
        &self,
        client: &C,
        environment: Environment,
        recipient: Address,
        amount: &DecimalAmount,
        secret: &EncryptedSecret,
    ) -> WalletResult<TransferReceipt> {
        let operation_id = Uuid::new_v4();
        let span = tracing::info_span!("send_native", %operation_id, %environment);

        async {
            let result = self.transfer_native(client, recipient, amount, secret).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "Native transfer aborted");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn transfer_native<C: ChainClient>(
        &self,
        client: &C,
        recipient: Address,
        amount: &DecimalAmount,
        secret: &EncryptedSecret,
    ) -> WalletResult<TransferReceipt> {
        let value = amount.to_smallest_unit(NATIVE_DECIMALS)?;
        let sender = self.open_sender(secret)?;
        tracing::info!(
            sender = %sender.signer.address(),
            %recipient,
            "Sending native currency"
        );

        let tx_hash = self
            .rpc(
                "native transfer",
                client.send_native(&sender.signer, recipient, value, GasPolicy::FUNDING),
            )
            .await
            .map_err(WalletError::NativeTransfer)?;
        let receipt = self
            .confirm("native transfer confirmation", client.wait_for_confirmation(tx_hash))
            .await
            .map_err(WalletError::NativeTransfer)?;
        if !receipt.confirmed {
            return Err(WalletError::NativeTransfer(ChainClientError::Reverted {
                tx_hash: receipt.transaction_id,
            }));
        }

        tracing::info!(tx_hash = %receipt.transaction_id, "Native transfer confirmed");
        Ok(receipt)
    }

    fn open_sender(&self, secret: &EncryptedSecret) -> WalletResult<Sender> {
        let signer = KeyMaterial::open(&self.codec, secret)?.signer()?;
        Ok(Sender {
            signer,
            role: self.treasury.classify(secret),
        })
    }

    /// Gas units for the token transfer times the current gas price, in wei.
    /// A missing gas price counts as zero.
    async fn estimate_cost<C: ChainClient>(
        &self,
        client: &C,
        sender: Address,
        request: &TransferRequest,
    ) -> WalletResult<U256> {
        let decimals = self
            .rpc("token decimals", client.token_decimals())
            .await
            .map_err(WalletError::GasEstimation)?;
        let amount = request.amount.to_smallest_unit(decimals)?;

        let gas_units = self
            .rpc(
                "transfer gas estimation",
                client.estimate_transfer_gas(sender, request.recipient, amount),
            )
            .await
            .map_err(WalletError::GasEstimation)?;
        let gas_price = self
            .rpc("gas price", client.gas_price())
            .await
            .map_err(WalletError::GasEstimation)?;

        if gas_price.is_none() {
            tracing::warn!("Gas price unavailable, sponsoring with zero");
        }

        Ok(U256::from(gas_units) * U256::from(gas_price.unwrap_or(0)))
    }

    /// Send `value` wei from the treasury to `sender` and wait for it.
    async fn fund<C: ChainClient>(&self, client: &C, sender: Address, value: U256) -> WalletResult<TransferReceipt> {
        let treasury = KeyMaterial::open(&self.codec, self.treasury.secret())?.signer()?;

        let tx_hash = self
            .rpc(
                "sponsorship transfer",
                client.send_native(&treasury, sender, value, GasPolicy::FUNDING),
            )
            .await
            .map_err(WalletError::Funding)?;
        tracing::info!(
            stage = %TransferStage::MaybeSponsor,
            tx_hash = %tx_hash,
            "Sponsorship submitted"
        );

        let receipt = self
            .confirm("sponsorship confirmation", client.wait_for_confirmation(tx_hash))
            .await
            .map_err(WalletError::Funding)?;
        if !receipt.confirmed {
            return Err(WalletError::Funding(ChainClientError::Reverted {
                tx_hash: receipt.transaction_id,
            }));
        }
        Ok(receipt)
    }

    async fn rpc<T>(
        &self,
        operation: &'static str,
        call: impl std::future::Future<Output = Result<T, ChainClientError>>,
    ) -> Result<T, ChainClientError> {
        with_deadline(self.timeouts.rpc, operation, call).await
    }

    async fn confirm<T>(
        &self,
        operation: &'static str,
        call: impl std::future::Future<Output = Result<T, ChainClientError>>,
    ) -> Result<T, ChainClientError> {
        with_deadline(self.timeouts.confirmation, operation, call).await
    }
}
