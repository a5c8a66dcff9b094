// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. Invalid values
//! abort startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `WALLET_ENCRYPTION_KEY` | Passphrase the wallet secret key is derived from | Required |
//! | `TREASURY_SECRET` | Encrypted secret of the gas sponsorship account | Required |
//! | `CAMP_PRODUCTION_RPC_URL` | Production RPC endpoint | `https://rpc.camp.raas.gelato.cloud` |
//! | `CAMP_PRODUCTION_TOKEN_ADDRESS` | Production token contract | `0x977f…dea7a` |
//! | `CAMP_SANDBOX_RPC_URL` | Sandbox RPC endpoint | `https://rpc.basecamp.t.raas.gelato.cloud` |
//! | `CAMP_SANDBOX_TOKEN_ADDRESS` | Sandbox token contract | `0xDdAD…571dE` |
//! | `RPC_TIMEOUT_SECS` | Deadline for each chain read or submission | `30` |
//! | `CONFIRMATION_TIMEOUT_SECS` | Deadline for each wait on mining | `120` |
//! | `CONFIRMATION_POLL_MS` | Receipt polling interval | `1000` |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use zeroize::Zeroizing;

use crate::blockchain::{Environment, NetworkConfig};
use crate::wallet::Timeouts;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Passphrase for the wallet secret codec. Never logged.
pub const ENCRYPTION_KEY_ENV: &str = "WALLET_ENCRYPTION_KEY";

/// Encrypted secret of the treasury account, in codec format.
///
/// Transfers signed with exactly this secret are not sponsored.
pub const TREASURY_SECRET_ENV: &str = "TREASURY_SECRET";

pub const RPC_TIMEOUT_ENV: &str = "RPC_TIMEOUT_SECS";
pub const CONFIRMATION_TIMEOUT_ENV: &str = "CONFIRMATION_TIMEOUT_SECS";
pub const CONFIRMATION_POLL_ENV: &str = "CONFIRMATION_POLL_MS";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CONFIRMATION_POLL_MS: u64 = 1000;

fn rpc_url_env(environment: Environment) -> &'static str {
    match environment {
        Environment::Production => "CAMP_PRODUCTION_RPC_URL",
        Environment::Sandbox => "CAMP_SANDBOX_RPC_URL",
    }
}

fn token_address_env(environment: Environment) -> &'static str {
    match environment {
        Environment::Production => "CAMP_PRODUCTION_TOKEN_ADDRESS",
        Environment::Sandbox => "CAMP_SANDBOX_TOKEN_ADDRESS",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("expected `json` or `pretty`, got `{other}`")),
        }
    }
}

/// Everything the service needs at startup.
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub encryption_key: Zeroizing<String>,
    pub treasury_secret: String,
    pub networks: Vec<NetworkConfig>,
    pub timeouts: Timeouts,
    pub confirmation_poll: Duration,
}

impl ServiceConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        fn parsed<T: FromStr>(
            name: &'static str,
            value: Option<String>,
            default: T,
        ) -> Result<T, ConfigError>
        where
            T::Err: fmt::Display,
        {
            match value {
                Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                    var: name,
                    reason: e.to_string(),
                }),
                None => Ok(default),
            }
        }

        let mut networks = Vec::with_capacity(Environment::ALL.len());
        for environment in Environment::ALL {
            let defaults = NetworkConfig::default_for(environment);

            let url_var = rpc_url_env(environment);
            let rpc_url = var(url_var).unwrap_or(defaults.rpc_url);
            url::Url::parse(&rpc_url).map_err(|e| ConfigError::Invalid {
                var: url_var,
                reason: e.to_string(),
            })?;

            let token_var = token_address_env(environment);
            let token_address: Address = parsed(token_var, var(token_var), defaults.token_address)?;

            networks.push(NetworkConfig {
                environment,
                rpc_url,
                token_address,
            });
        }

        let defaults = Timeouts::default();
        let timeouts = Timeouts {
            rpc: Duration::from_secs(parsed(RPC_TIMEOUT_ENV, var(RPC_TIMEOUT_ENV), defaults.rpc.as_secs())?),
            confirmation: Duration::from_secs(parsed(
                CONFIRMATION_TIMEOUT_ENV,
                var(CONFIRMATION_TIMEOUT_ENV),
                defaults.confirmation.as_secs(),
            )?),
        };
        let confirmation_poll = Duration::from_millis(parsed(
            CONFIRMATION_POLL_ENV,
            var(CONFIRMATION_POLL_ENV),
            DEFAULT_CONFIRMATION_POLL_MS,
        )?);

        for (name, value) in [
            (RPC_TIMEOUT_ENV, timeouts.rpc),
            (CONFIRMATION_TIMEOUT_ENV, timeouts.confirmation),
            (CONFIRMATION_POLL_ENV, confirmation_poll),
        ] {
            if value.is_zero() {
                return Err(ConfigError::Invalid {
                    var: name,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(Self {
            host: var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parsed(PORT_ENV, var(PORT_ENV), DEFAULT_PORT)?,
            log_format: parsed(LOG_FORMAT_ENV, var(LOG_FORMAT_ENV), LogFormat::default())?,
            encryption_key: Zeroizing::new(required(ENCRYPTION_KEY_ENV)?),
            treasury_secret: required(TREASURY_SECRET_ENV)?,
            networks,
            timeouts,
            confirmation_poll,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_format", &self.log_format)
            .field("networks", &self.networks)
            .field("timeouts", &self.timeouts)
            .field("confirmation_poll", &self.confirmation_poll)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        (ENCRYPTION_KEY_ENV, "passphrase"),
        (TREASURY_SECRET_ENV, "v1:AAAA"),
    ];

    #[test]
    fn defaults_apply() {
        let config = ServiceConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.timeouts, Timeouts::default());
        assert_eq!(config.confirmation_poll, Duration::from_millis(1000));
        assert_eq!(config.networks.len(), 2);
        assert_eq!(
            config.networks[0],
            NetworkConfig::default_for(Environment::Production)
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PORT", "9000"),
            ("LOG_FORMAT", "JSON"),
            ("CAMP_SANDBOX_RPC_URL", "http://localhost:8545"),
            ("CAMP_SANDBOX_TOKEN_ADDRESS", "0x00000000000000000000000000000000000000aa"),
            ("RPC_TIMEOUT_SECS", "5"),
        ]);
        let config = ServiceConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.timeouts.rpc, Duration::from_secs(5));
        let sandbox = &config.networks[1];
        assert_eq!(sandbox.environment, Environment::Sandbox);
        assert_eq!(sandbox.rpc_url, "http://localhost:8545");
        assert_eq!(
            sandbox.token_address,
            "0x00000000000000000000000000000000000000aa".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn missing_required_values_fail() {
        let err = ServiceConfig::from_lookup(lookup(&[(ENCRYPTION_KEY_ENV, "x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(TREASURY_SECRET_ENV)));
    }

    #[test]
    fn invalid_values_fail() {
        for (name, value) in [
            ("PORT", "eighty"),
            ("LOG_FORMAT", "xml"),
            ("CAMP_PRODUCTION_RPC_URL", "not a url"),
            ("CAMP_PRODUCTION_TOKEN_ADDRESS", "0x1234"),
            ("CONFIRMATION_TIMEOUT_SECS", "0"),
        ] {
            let mut vars = REQUIRED.to_vec();
            vars.push((name, value));
            let err = ServiceConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { var, .. } if var == name),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn debug_hides_secrets() {
        let config = ServiceConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("passphrase"));
        assert!(!printed.contains("v1:AAAA"));
    }
}
