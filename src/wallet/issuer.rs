// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet creation.

use crate::blockchain::{WalletRecord, CHAIN_LABEL};
use crate::crypto::{KeyMaterial, SecretCodec};

use super::error::{WalletError, WalletResult};

/// Generates key pairs and hands them back sealed.
#[derive(Debug, Clone)]
pub struct WalletIssuer {
    codec: SecretCodec,
}

impl WalletIssuer {
    pub fn new(codec: SecretCodec) -> Self {
        Self { codec }
    }

    /// Generate a fresh wallet. Only the sealed secret leaves this call.
    pub fn create_wallet(&self) -> WalletResult<WalletRecord> {
        let material = KeyMaterial::generate();
        let address = material
            .signer()
            .map_err(|e| WalletError::KeyGeneration(e.to_string()))?
            .address();
        let secret = material
            .seal(&self.codec)
            .map_err(|e| WalletError::KeyGeneration(e.to_string()))?;

        Ok(WalletRecord {
            address: address.to_checksum(None),
            encrypted_secret: secret.into_inner(),
            chain_label: CHAIN_LABEL.to_string(),
        })
    }
}
