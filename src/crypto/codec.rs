// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Symmetric protection of wallet key material.
//!
//! ## Format
//!
//! ```text
//! v1:<base64(nonce[12] || ciphertext || tag[16])>
//! ```
//!
//! AES-256-GCM with a fresh random nonce per call. The key is the SHA-256
//! digest of the process-wide passphrase, so the codec needs no context
//! beyond that passphrase to invert its own output.

use std::fmt;

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64ct::{Base64, Encoding};
use k256::elliptic_curve::subtle::ConstantTimeEq;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

const VERSION_PREFIX: &str = "v1:";
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Errors returned when a ciphertext cannot be opened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecryptionError {
    #[error("ciphertext is malformed: {0}")]
    Malformed(&'static str),

    #[error("unsupported ciphertext version")]
    UnsupportedVersion,

    #[error("ciphertext failed authentication")]
    Authentication,

    #[error("decrypted payload is not valid key material")]
    InvalidPayload,
}

/// Returned when the AEAD refuses to seal a buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("encryption failed")]
pub struct EncryptionError;

/// Opaque ciphertext of a wallet's key material.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedSecret(String);

impl EncryptedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Exact comparison that does not short-circuit on the first mismatch.
    pub fn ct_matches(&self, other: &EncryptedSecret) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl From<String> for EncryptedSecret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptedSecret(..)")
    }
}

/// AES-256-GCM codec keyed from the process-wide passphrase.
#[derive(Clone)]
pub struct SecretCodec {
    cipher: Aes256Gcm,
}

impl SecretCodec {
    /// Derive the codec key from a passphrase.
    pub fn from_passphrase(passphrase: &str) -> Self {
        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&Sha256::digest(passphrase.as_bytes()));
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice())),
        }
    }

    /// Encrypt `plain` into the self-describing text format.
    pub fn encrypt(&self, plain: &[u8]) -> Result<EncryptedSecret, EncryptionError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plain)
            .map_err(|_| EncryptionError)?;

        let mut framed = Vec::with_capacity(NONCE_LEN + sealed.len());
        framed.extend_from_slice(nonce.as_slice());
        framed.extend_from_slice(&sealed);

        Ok(EncryptedSecret(format!(
            "{VERSION_PREFIX}{}",
            Base64::encode_string(&framed)
        )))
    }

    /// Invert [`SecretCodec::encrypt`]. Either the whole plaintext or an error.
    pub fn decrypt(&self, secret: &EncryptedSecret) -> Result<Zeroizing<Vec<u8>>, DecryptionError> {
        let encoded = secret
            .as_str()
            .strip_prefix(VERSION_PREFIX)
            .ok_or_else(|| {
                if secret.as_str().starts_with('v') && secret.as_str().contains(':') {
                    DecryptionError::UnsupportedVersion
                } else {
                    DecryptionError::Malformed("missing version prefix")
                }
            })?;

        let framed = Base64::decode_vec(encoded)
            .map_err(|_| DecryptionError::Malformed("invalid base64"))?;

        if framed.len() < NONCE_LEN + TAG_LEN {
            return Err(DecryptionError::Malformed("ciphertext too short"));
        }

        let (nonce, sealed) = framed.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map(Zeroizing::new)
            .map_err(|_| DecryptionError::Authentication)
    }
}

impl fmt::Debug for SecretCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretCodec(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SecretCodec {
        SecretCodec::from_passphrase("unit-test-passphrase")
    }

    #[test]
    fn test_round_trip_various_payloads() {
        let codec = codec();
        let payloads: [&[u8]; 4] = [
            b"",
            b"{\"privateKey\":\"0x01\"}",
            &[0u8, 255, 1, 254, 2, 253],
            &[7u8; 1024],
        ];

        for payload in payloads {
            let sealed = codec.encrypt(payload).expect("encrypt");
            assert!(sealed.as_str().starts_with(VERSION_PREFIX));
            let opened = codec.decrypt(&sealed).expect("decrypt");
            assert_eq!(opened.as_slice(), payload);
        }
    }

    #[test]
    fn test_nonce_is_fresh_per_call() {
        let codec = codec();
        let a = codec.encrypt(b"same").unwrap();
        let b = codec.encrypt(b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let sealed = codec().encrypt(b"secret").unwrap();
        let other = SecretCodec::from_passphrase("another-passphrase");
        assert_eq!(other.decrypt(&sealed), Err(DecryptionError::Authentication));
    }

    #[test]
    fn test_corrupted_ciphertext_is_rejected() {
        let codec = codec();
        let sealed = codec.encrypt(b"secret key material").unwrap();
        let encoded = sealed.as_str().strip_prefix(VERSION_PREFIX).unwrap();
        let mut framed = Base64::decode_vec(encoded).unwrap();

        // Flip one bit in every position; none may decrypt.
        for i in 0..framed.len() {
            framed[i] ^= 0x01;
            let tampered =
                EncryptedSecret::new(format!("{VERSION_PREFIX}{}", Base64::encode_string(&framed)));
            assert_eq!(codec.decrypt(&tampered), Err(DecryptionError::Authentication));
            framed[i] ^= 0x01;
        }
    }

    #[test]
    fn test_malformed_inputs() {
        let codec = codec();
        assert!(matches!(
            codec.decrypt(&EncryptedSecret::new("plain text")),
            Err(DecryptionError::Malformed(_))
        ));
        assert!(matches!(
            codec.decrypt(&EncryptedSecret::new("v1:***")),
            Err(DecryptionError::Malformed(_))
        ));
        assert!(matches!(
            codec.decrypt(&EncryptedSecret::new("v1:AAAA")),
            Err(DecryptionError::Malformed(_))
        ));
        assert_eq!(
            codec.decrypt(&EncryptedSecret::new("v2:AAAA")),
            Err(DecryptionError::UnsupportedVersion)
        );
    }

    #[test]
    fn test_ct_matches() {
        let a = EncryptedSecret::new("v1:abc");
        assert!(a.ct_matches(&EncryptedSecret::new("v1:abc")));
        assert!(!a.ct_matches(&EncryptedSecret::new("v1:abd")));
        assert!(!a.ct_matches(&EncryptedSecret::new("v1:ab")));
    }

    #[test]
    fn test_debug_is_redacted() {
        let sealed = codec().encrypt(b"secret").unwrap();
        assert_eq!(format!("{sealed:?}"), "EncryptedSecret(..)");
        assert_eq!(format!("{:?}", codec()), "SecretCodec(..)");
    }
}
