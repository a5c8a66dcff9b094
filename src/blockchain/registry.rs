// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Environment → chain client mapping.
//!
//! The set of environments and their network configuration is fixed when
//! the registry is built. Clients are constructed lazily on first use and
//! shared for the rest of the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;

use super::client::ChainClientError;
use super::types::{Environment, NetworkConfig};

/// Builds a client for one network.
pub type Connector<C> = Box<dyn Fn(&NetworkConfig) -> Result<C, ChainClientError> + Send + Sync>;

/// Errors from [`EnvironmentRegistry::resolve`].
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Unsupported environment: {0}")]
    UnsupportedEnvironment(Environment),

    #[error("Failed to build client for {environment}: {source}")]
    Connect {
        environment: Environment,
        #[source]
        source: ChainClientError,
    },
}

struct Slot<C> {
    network: NetworkConfig,
    client: OnceCell<Arc<C>>,
}

/// One memoized chain client per configured environment.
pub struct EnvironmentRegistry<C> {
    slots: HashMap<Environment, Slot<C>>,
    connector: Connector<C>,
}

impl<C> EnvironmentRegistry<C> {
    /// Create a registry over `networks`. Later entries for the same
    /// environment replace earlier ones.
    pub fn new(
        networks: impl IntoIterator<Item = NetworkConfig>,
        connector: impl Fn(&NetworkConfig) -> Result<C, ChainClientError> + Send + Sync + 'static,
    ) -> Self {
        let slots = networks
            .into_iter()
            .map(|network| {
                (
                    network.environment,
                    Slot {
                        network,
                        client: OnceCell::new(),
                    },
                )
            })
            .collect();

        Self {
            slots,
            connector: Box::new(connector),
        }
    }

    /// Network configuration of an environment, if configured.
    pub fn network(&self, environment: Environment) -> Option<&NetworkConfig> {
        self.slots.get(&environment).map(|slot| &slot.network)
    }

    /// Configured environments.
    pub fn environments(&self) -> impl Iterator<Item = Environment> + '_ {
        self.slots.keys().copied()
    }

    /// Client for `environment`, built on first use.
    ///
    /// Unknown environments fail before the connector is invoked.
    pub async fn resolve(&self, environment: Environment) -> Result<Arc<C>, RegistryError> {
        let slot = self
            .slots
            .get(&environment)
            .ok_or(RegistryError::UnsupportedEnvironment(environment))?;

        let client = slot
            .client
            .get_or_try_init(|| async {
                tracing::debug!(%environment, "Creating chain client");
                (self.connector)(&slot.network).map(Arc::new)
            })
            .await
            .map_err(|source| RegistryError::Connect {
                environment,
                source,
            })?;

        Ok(Arc::clone(client))
    }
}
