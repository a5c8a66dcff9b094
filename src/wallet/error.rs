// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use alloy::primitives::Address;

use crate::blockchain::{AmountError, ChainClientError, RegistryError, UnknownEnvironment};
use crate::crypto::DecryptionError;

/// Errors surfaced by the public wallet operations.
///
/// Network-facing variants keep the underlying [`ChainClientError`] as
/// their source. Nothing is retried and nothing is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("Unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    #[error("Invalid wallet secret: {0}")]
    Decryption(#[from] DecryptionError),

    #[error("Chain query failed: {0}")]
    ChainQuery(#[source] ChainClientError),

    #[error("Gas estimation failed: {0}")]
    GasEstimation(#[source] ChainClientError),

    #[error("Gas sponsorship failed: {0}")]
    Funding(#[source] ChainClientError),

    #[error("Token transfer failed: {0}")]
    Transfer(#[source] ChainClientError),

    #[error("Native transfer failed: {0}")]
    NativeTransfer(#[source] ChainClientError),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
}

pub type WalletResult<T> = Result<T, WalletError>;

impl WalletError {
    /// Underlying chain error, if any.
    pub fn chain_error(&self) -> Option<&ChainClientError> {
        match self {
            WalletError::ChainQuery(e)
            | WalletError::GasEstimation(e)
            | WalletError::Funding(e)
            | WalletError::Transfer(e)
            | WalletError::NativeTransfer(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the node rejected a transaction for lack of funds.
    pub fn is_insufficient_funds(&self) -> bool {
        self.chain_error()
            .map(|e| e.to_string().to_ascii_lowercase().contains("insufficient funds"))
            .unwrap_or(false)
    }
}

impl From<UnknownEnvironment> for WalletError {
    fn from(err: UnknownEnvironment) -> Self {
        WalletError::UnsupportedEnvironment(err.0)
    }
}

impl From<RegistryError> for WalletError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnsupportedEnvironment(environment) => {
                WalletError::UnsupportedEnvironment(environment.to_string())
            }
            RegistryError::Connect { source, .. } => WalletError::ChainQuery(source),
        }
    }
}

/// Parse a 20-byte hex address.
pub fn parse_address(raw: &str) -> WalletResult<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|_| WalletError::InvalidAddress(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::Environment;

    #[test]
    fn parse_address_accepts_hex_and_rejects_garbage() {
        let parsed = parse_address("0xDdADD1F2722c688f27877d4695e2bd995e5571dE").unwrap();
        assert_eq!(parsed, crate::blockchain::SANDBOX_TOKEN_ADDRESS);

        assert!(matches!(parse_address("0x1234"), Err(WalletError::InvalidAddress(_))));
        assert!(matches!(parse_address("not an address"), Err(WalletError::InvalidAddress(_))));
    }

    #[test]
    fn registry_errors_map_to_wallet_errors() {
        let err: WalletError = RegistryError::UnsupportedEnvironment(Environment::Sandbox).into();
        assert!(matches!(err, WalletError::UnsupportedEnvironment(ref tag) if tag == "sandbox"));

        let err: WalletError = RegistryError::Connect {
            environment: Environment::Production,
            source: ChainClientError::InvalidRpcUrl("x".to_string()),
        }
        .into();
        assert!(matches!(err, WalletError::ChainQuery(_)));
    }

    #[test]
    fn insufficient_funds_is_detected_from_source() {
        let err = WalletError::Transfer(ChainClientError::TransactionFailed(
            "server returned an error response: insufficient funds for gas * price + value".into(),
        ));
        assert!(err.is_insufficient_funds());
        assert!(!WalletError::InvalidAddress("x".into()).is_insufficient_funds());
    }

    #[test]
    fn source_is_preserved() {
        use std::error::Error;
        let err = WalletError::ChainQuery(ChainClientError::RpcError("down".into()));
        assert_eq!(err.source().unwrap().to_string(), "RPC error: down");
    }
}
