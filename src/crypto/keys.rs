// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! secp256k1 key material and its canonical byte encoding.
//!
//! ## Security
//!
//! - `KeyMaterial` zeroizes on drop and never prints its contents
//! - Plaintext bytes only exist inside [`Zeroizing`] buffers
//! - Signers are built per operation and dropped with it

use std::fmt;

use alloy::{primitives::{keccak256, Address}, signers::local::PrivateKeySigner};
use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::rand_core::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::codec::{DecryptionError, EncryptedSecret, EncryptionError, SecretCodec};
use crate::blockchain::create_signer;

/// Decrypted signing credentials of one wallet.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct KeyMaterial {
    /// 0x-prefixed 32-byte secret scalar
    pub private_key: String,
    /// 0x-prefixed uncompressed SEC1 public key
    pub public_key: String,
}

impl KeyMaterial {
    /// Generate fresh key material from the OS entropy source.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = signing_key.verifying_key();

        Self {
            private_key: alloy::hex::encode_prefixed(signing_key.to_bytes()),
            public_key: alloy::hex::encode_prefixed(
                verifying_key.to_encoded_point(false).as_bytes(),
            ),
        }
    }

    /// Canonical byte encoding (compact JSON).
    pub fn to_bytes(&self) -> Result<Zeroizing<Vec<u8>>, serde_json::Error> {
        serde_json::to_vec(self).map(Zeroizing::new)
    }

    /// Parse the canonical byte encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecryptionError> {
        serde_json::from_slice(bytes).map_err(|_| DecryptionError::InvalidPayload)
    }

    /// Encrypt into an opaque secret.
    pub fn seal(&self, codec: &SecretCodec) -> Result<EncryptedSecret, EncryptionError> {
        let plain = self.to_bytes().map_err(|_| EncryptionError)?;
        codec.encrypt(&plain)
    }

    /// Decrypt and parse an opaque secret.
    pub fn open(codec: &SecretCodec, secret: &EncryptedSecret) -> Result<Self, DecryptionError> {
        let plain = codec.decrypt(secret)?;
        Self::from_bytes(&plain)
    }

    /// Build a transaction signer. The private key must match the stored
    /// public key.
    pub fn signer(&self) -> Result<PrivateKeySigner, DecryptionError> {
        let signer =
            create_signer(&self.private_key).map_err(|_| DecryptionError::InvalidPayload)?;

        let expected = alloy::hex::decode(&self.public_key)
            .map_err(|_| DecryptionError::InvalidPayload)?;
        let actual = signer
            .credential()
            .verifying_key()
            .to_encoded_point(false);
        if actual.as_bytes() != expected.as_slice() {
            return Err(DecryptionError::InvalidPayload);
        }

        Ok(signer)
    }

    /// Address derived from the public key.
    pub fn address(&self) -> Result<Address, DecryptionError> {
        let bytes = alloy::hex::decode(&self.public_key)
            .map_err(|_| DecryptionError::InvalidPayload)?;
        let key = VerifyingKey::from_sec1_bytes(&bytes)
            .map_err(|_| DecryptionError::InvalidPayload)?;
        Ok(address_of(&key))
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(..)")
    }
}

/// Derive the EVM address of a public key.
pub fn address_of(key: &VerifyingKey) -> Address {
    let public_key_uncompressed = key.to_encoded_point(false);
    let public_key_bytes = public_key_uncompressed.as_bytes();
    let hash = keccak256(&public_key_bytes[1..]);
    Address::from_slice(&hash[12..])
}

/// Whose key is signing a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderRole {
    /// The central account that pays for everyone's gas.
    Treasury,
    /// Any other wallet; needs gas sponsorship.
    User,
}

/// The configured treasury secret and its address.
#[derive(Clone)]
pub struct TreasuryCredential {
    secret: EncryptedSecret,
    address: Address,
}

impl TreasuryCredential {
    /// Validate the configured secret against the codec.
    pub fn new(codec: &SecretCodec, secret: EncryptedSecret) -> Result<Self, DecryptionError> {
        let material = KeyMaterial::open(codec, &secret)?;
        let address = material.signer()?.address();
        Ok(Self { secret, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn secret(&self) -> &EncryptedSecret {
        &self.secret
    }

    /// Classify a sender by exact, constant-time comparison of its
    /// encrypted secret with the treasury's.
    pub fn classify(&self, secret: &EncryptedSecret) -> SenderRole {
        if self.secret.ct_matches(secret) {
            SenderRole::Treasury
        } else {
            SenderRole::User
        }
    }
}

impl fmt::Debug for TreasuryCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreasuryCredential")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SecretCodec {
        SecretCodec::from_passphrase("keys-test")
    }

    #[test]
    fn test_generate_has_expected_shape() {
        let material = KeyMaterial::generate();
        assert!(material.private_key.starts_with("0x"));
        assert_eq!(material.private_key.len(), 66);
        assert!(material.public_key.starts_with("0x04"));
        assert_eq!(material.public_key.len(), 132);
    }

    #[test]
    fn test_canonical_encoding_uses_camel_case() {
        let material = KeyMaterial::generate();
        let bytes = material.to_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["privateKey"], material.private_key.as_str());
        assert_eq!(json["publicKey"], material.public_key.as_str());
    }

    #[test]
    fn test_seal_open_and_address_agree_with_signer() {
        let codec = codec();
        let material = KeyMaterial::generate();
        let sealed = material.seal(&codec).unwrap();

        let opened = KeyMaterial::open(&codec, &sealed).unwrap();
        assert_eq!(opened.private_key, material.private_key);

        let signer = opened.signer().unwrap();
        assert_eq!(signer.address(), opened.address().unwrap());
    }

    #[test]
    fn test_open_rejects_non_key_payload() {
        let codec = codec();
        let sealed = codec.encrypt(b"not json").unwrap();
        assert_eq!(
            KeyMaterial::open(&codec, &sealed).unwrap_err(),
            DecryptionError::InvalidPayload
        );
    }

    #[test]
    fn test_signer_rejects_mismatched_public_key() {
        let mut material = KeyMaterial::generate();
        material.public_key = KeyMaterial::generate().public_key.clone();
        assert_eq!(material.signer().unwrap_err(), DecryptionError::InvalidPayload);
    }

    #[test]
    fn test_treasury_classification() {
        let codec = codec();
        let treasury_secret = KeyMaterial::generate().seal(&codec).unwrap();
        let treasury = TreasuryCredential::new(&codec, treasury_secret.clone()).unwrap();

        assert_eq!(treasury.classify(&treasury_secret), SenderRole::Treasury);

        let user_secret = KeyMaterial::generate().seal(&codec).unwrap();
        assert_eq!(treasury.classify(&user_secret), SenderRole::User);

        // Same key, different ciphertext: not the configured treasury secret.
        let resealed = KeyMaterial::open(&codec, &treasury_secret)
            .unwrap()
            .seal(&codec)
            .unwrap();
        assert_eq!(treasury.classify(&resealed), SenderRole::User);
    }

    #[test]
    fn test_treasury_rejects_undecryptable_secret() {
        let err = TreasuryCredential::new(&codec(), EncryptedSecret::new("garbage")).unwrap_err();
        assert!(matches!(err, DecryptionError::Malformed(_)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let material = KeyMaterial::generate();
        let printed = format!("{material:?}");
        assert!(!printed.contains(&material.private_key[2..]));
        assert_eq!(printed, "KeyMaterial(..)");
    }
}
