// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversion between human-readable decimal strings and smallest-unit integers.
//!
//! All arithmetic is done on `U256`; no floating point is involved.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;

/// Errors raised while parsing or scaling an amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("negative amounts are not allowed")]
    Negative,

    #[error("amount is not a decimal number: {0}")]
    NotNumeric(String),

    #[error("too many decimal places (max {max})")]
    TooManyDecimals { max: u8 },

    #[error("amount overflows 256 bits")]
    Overflow,
}

/// A validated non-negative decimal amount, not yet bound to a precision.
///
/// Parsing checks syntax only, so it can run before any token metadata is
/// known. Scaling happens in [`DecimalAmount::to_smallest_unit`].
#[derive(Clone, PartialEq, Eq)]
pub struct DecimalAmount {
    whole: String,
    fraction: String,
}

impl DecimalAmount {
    /// Scale to the integer representation for `decimals` places.
    pub fn to_smallest_unit(&self, decimals: u8) -> Result<U256, AmountError> {
        let fraction = self.fraction.trim_end_matches('0');
        if fraction.len() > decimals as usize {
            return Err(AmountError::TooManyDecimals { max: decimals });
        }

        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        let digits = format!("{}{}", self.whole, padded);
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(U256::ZERO);
        }

        U256::from_str_radix(digits, 10).map_err(|_| AmountError::Overflow)
    }
}

impl FromStr for DecimalAmount {
    type Err = AmountError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(AmountError::Empty);
        }
        if raw.starts_with('-') {
            return Err(AmountError::Negative);
        }

        let (whole, fraction) = match raw.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (raw, ""),
        };

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(AmountError::NotNumeric(raw.to_string()));
        }

        Ok(Self {
            whole: whole.to_string(),
            fraction: fraction.to_string(),
        })
    }
}

// Amounts stay out of logs; keep Debug opaque.
impl fmt::Debug for DecimalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DecimalAmount(..)")
    }
}

/// Parse a human-readable amount straight into smallest units.
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "1.5")
/// * `decimals` - Number of decimals (18 for native, 6 for USDC)
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    amount.parse::<DecimalAmount>()?.to_smallest_unit(decimals)
}

/// Format smallest units as a decimal string.
///
/// Always carries a fractional part (`"1.0"`, `"0.0"`), trims trailing
/// zeros and never rounds.
pub fn format_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return format!("{amount}.0");
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
    let trimmed = decimal_str.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}
