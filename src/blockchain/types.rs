// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Chain family tag attached to every wallet record.
pub const CHAIN_LABEL: &str = "CAMP";

/// Symbol reported for native-currency amounts.
pub const NATIVE_SYMBOL: &str = "CAMP";

/// Native currency precision (wei).
pub const NATIVE_DECIMALS: u8 = 18;

/// Gas limit used when the treasury funds a sender.
pub const FUNDING_GAS_LIMIT: u64 = 40_000;

/// Gas price used when the treasury funds a sender (20 gwei).
pub const FUNDING_GAS_PRICE_WEI: u128 = 20_000_000_000;

/// Default Camp mainnet RPC endpoint.
pub const PRODUCTION_RPC_URL: &str = "https://rpc.camp.raas.gelato.cloud";

/// Default USDC contract on Camp mainnet.
pub const PRODUCTION_TOKEN_ADDRESS: Address = address!("977fdEF62CE095Ae8750Fd3496730F24F60dea7a");

/// Default Camp testnet (Basecamp) RPC endpoint.
pub const SANDBOX_RPC_URL: &str = "https://rpc.basecamp.t.raas.gelato.cloud";

/// Default USDC contract on the Camp testnet.
pub const SANDBOX_TOKEN_ADDRESS: Address = address!("DdADD1F2722c688f27877d4695e2bd995e5571dE");

/// Deployment target selected per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Sandbox,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Production, Environment::Sandbox];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an environment tag is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported environment: {0}")]
pub struct UnknownEnvironment(pub String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "sandbox" => Ok(Environment::Sandbox),
            _ => Err(UnknownEnvironment(raw.to_string())),
        }
    }
}

/// RPC endpoint and token contract for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub environment: Environment,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Fungible token contract served in this environment
    pub token_address: Address,
}

impl NetworkConfig {
    /// Built-in configuration for an environment.
    pub fn default_for(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self {
                environment,
                rpc_url: PRODUCTION_RPC_URL.to_string(),
                token_address: PRODUCTION_TOKEN_ADDRESS,
            },
            Environment::Sandbox => Self {
                environment,
                rpc_url: SANDBOX_RPC_URL.to_string(),
                token_address: SANDBOX_TOKEN_ADDRESS,
            },
        }
    }
}

/// Newly issued wallet. The encrypted secret is handed to the caller and
/// not retained by the service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    /// Checksummed public address
    pub address: String,
    /// Opaque ciphertext of the key material
    pub encrypted_secret: String,
    /// Chain family tag (always `CAMP`)
    pub chain_label: String,
}

/// Token and native balances of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    /// Token name as reported by the contract
    pub token_name: String,
    /// Token balance in human-readable units
    pub token_balance: String,
    /// Native balance in human-readable units
    pub native_balance: String,
}

/// Native amount the treasury will send to cover a sender's gas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GasSponsorshipEstimate {
    pub native_amount: String,
    pub native_symbol: String,
}

/// Confirmed on-chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    /// Transaction hash (0x-prefixed)
    pub transaction_id: String,
    /// Whether the transaction executed successfully
    pub confirmed: bool,
    /// Block the transaction was mined in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

/// Chain head information for an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    pub environment: Environment,
    pub chain_id: u64,
    pub block_number: u64,
}

/// Gas parameters for a native-currency send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPolicy {
    pub gas_limit: u64,
    pub gas_price_wei: u128,
}

impl GasPolicy {
    /// Fixed policy used for treasury funding transactions.
    pub const FUNDING: GasPolicy = GasPolicy {
        gas_limit: FUNDING_GAS_LIMIT,
        gas_price_wei: FUNDING_GAS_PRICE_WEI,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_known_tags() {
        assert_eq!("production".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!(" Sandbox ".parse::<Environment>(), Ok(Environment::Sandbox));
        assert_eq!(
            "staging".parse::<Environment>(),
            Err(UnknownEnvironment("staging".to_string()))
        );
    }

    #[test]
    fn environment_serializes_lowercase() {
        let json = serde_json::to_string(&Environment::Sandbox).unwrap();
        assert_eq!(json, r#""sandbox""#);
        assert_eq!(Environment::Production.to_string(), "production");
    }

    #[test]
    fn default_networks_are_distinct() {
        let prod = NetworkConfig::default_for(Environment::Production);
        let sandbox = NetworkConfig::default_for(Environment::Sandbox);
        assert_ne!(prod.rpc_url, sandbox.rpc_url);
        assert_ne!(prod.token_address, sandbox.token_address);
        assert_eq!(prod.environment, Environment::Production);
    }

    #[test]
    fn receipt_uses_camel_case() {
        let receipt = TransferReceipt {
            transaction_id: "0xabc".to_string(),
            confirmed: true,
            block_number: Some(7),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["transactionId"], "0xabc");
        assert_eq!(json["blockNumber"], 7);
    }
}
