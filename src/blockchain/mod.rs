// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for the Camp chain.
//!
//! This module provides functionality for:
//! - Querying native CAMP balances
//! - Querying and transferring the environment's ERC-20 token
//! - Native-currency sends with an explicit gas policy
//! - One memoized client per environment

pub mod client;
pub mod erc20;
pub mod registry;
pub mod types;
pub mod units;

pub use client::{create_signer, with_deadline, ChainClient, ChainClientError, EvmClient};
pub use registry::{EnvironmentRegistry, RegistryError};
pub use types::*;
pub use units::{format_units, parse_units, AmountError, DecimalAmount};
