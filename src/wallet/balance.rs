// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token and native balance reads.

use std::time::Duration;

use alloy::primitives::Address;

use crate::blockchain::{format_units, with_deadline, BalanceReport, ChainClient, NATIVE_DECIMALS};

use super::error::{WalletError, WalletResult};

/// Reads the four values behind a [`BalanceReport`].
#[derive(Debug, Clone, Copy)]
pub struct BalanceReporter {
    rpc_timeout: Duration,
}

impl BalanceReporter {
    pub fn new(rpc_timeout: Duration) -> Self {
        Self { rpc_timeout }
    }

    /// Balance of `owner`. Either all reads succeed or the call fails.
    pub async fn report<C: ChainClient>(&self, client: &C, owner: Address) -> WalletResult<BalanceReport> {
        let limit = self.rpc_timeout;
        let (token_name, decimals, token_balance, native_balance) = tokio::try_join!(
            with_deadline(limit, "token name", client.token_name()),
            with_deadline(limit, "token decimals", client.token_decimals()),
            with_deadline(limit, "token balance", client.token_balance(owner)),
            with_deadline(limit, "native balance", client.native_balance(owner)),
        )
        .map_err(WalletError::ChainQuery)?;

        Ok(BalanceReport {
            token_name,
            token_balance: format_units(token_balance, decimals),
            native_balance: format_units(native_balance, NATIVE_DECIMALS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::testing::{ChainCall, MockChainClient};
    use alloy::primitives::U256;

    const OWNER: Address = Address::repeat_byte(0xaa);

    #[tokio::test]
    async fn formats_token_and_native_balances() {
        let client = MockChainClient::new()
            .with_decimals(6)
            .with_balances(U256::from(1_000_000u64), U256::from(2_000_000_000_000_000_000u64));

        let report = BalanceReporter::new(Duration::from_secs(1))
            .report(&client, OWNER)
            .await
            .unwrap();

        assert_eq!(
            report,
            BalanceReport {
                token_name: "USD Coin".to_string(),
                token_balance: "1.0".to_string(),
                native_balance: "2.0".to_string(),
            }
        );

        let calls = client.calls();
        assert!(calls.contains(&ChainCall::TokenBalance(OWNER)));
        assert!(calls.contains(&ChainCall::NativeBalance(OWNER)));
    }

    #[tokio::test]
    async fn empty_account_reports_zero() {
        let client = MockChainClient::new();
        let report = BalanceReporter::new(Duration::from_secs(1))
            .report(&client, OWNER)
            .await
            .unwrap();
        assert_eq!(report.token_balance, "0.0");
        assert_eq!(report.native_balance, "0.0");
    }

    #[tokio::test]
    async fn any_failed_read_fails_the_report() {
        for method in ["token_name", "token_decimals", "token_balance", "native_balance"] {
            let client = MockChainClient::new().failing(method);
            let err = BalanceReporter::new(Duration::from_secs(1))
                .report(&client, OWNER)
                .await
                .unwrap_err();
            assert!(matches!(err, WalletError::ChainQuery(_)), "{method}: {err}");
        }
    }
}
