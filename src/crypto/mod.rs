// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key material handling.
//!
//! - `codec` - AES-256-GCM protection of serialized keys
//! - `keys` - secp256k1 generation, signers and the treasury credential

pub mod codec;
pub mod keys;

pub use codec::{DecryptionError, EncryptedSecret, EncryptionError, SecretCodec};
pub use keys::{address_of, KeyMaterial, SenderRole, TreasuryCredential};
