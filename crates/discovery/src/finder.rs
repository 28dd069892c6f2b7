//! Transport-specific discovery capability.

use crate::state::InstanceState;
use async_trait::async_trait;
use galley_common::types::Transport;
use galley_common::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Discovers the addresses and FQDN of one instance over its transport.
///
/// Implementations run transport-specific queries (remote shell
/// commands, WinRM calls, ...) against the instance described by the
/// state they were created with. This abstraction allows different
/// transport backends to be swapped without changing the resolver
/// logic.
#[async_trait]
pub trait Finder: Send + Sync {
    /// Candidate IP addresses, in probe order.
    ///
    /// An empty list means the transport could not discover any
    /// address. No ordering guarantee is made beyond "probe in this
    /// order".
    ///
    /// # Errors
    /// Returns an error if the transport query itself fails.
    async fn find_ips(&self) -> Result<Vec<String>>;

    /// Fully-qualified domain name of the instance.
    ///
    /// # Errors
    /// Returns an error if the lookup fails for any reason, including
    /// connectivity or auth problems.
    async fn find_fqdn(&self) -> Result<String>;
}

/// Creates finders bound to a given connection state.
pub trait FinderFactory: Send + Sync {
    /// Build a finder for the instance described by `state`.
    fn create(&self, state: &InstanceState) -> Box<dyn Finder>;
}

/// Registry mapping transports to finder factories.
///
/// The harness registers one factory per transport it supports; the
/// resolver looks finders up by the instance's transport.
#[derive(Default)]
pub struct FinderRegistry {
    factories: HashMap<Transport, Arc<dyn FinderFactory>>,
}

impl FinderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a transport, replacing any existing one.
    pub fn register(&mut self, transport: Transport, factory: Arc<dyn FinderFactory>) {
        self.factories.insert(transport, factory);
    }

    /// Build a finder for the given transport and connection state.
    ///
    /// # Errors
    /// Returns `Error::UnknownTransport` if no factory is registered.
    pub fn for_transport(
        &self,
        transport: &Transport,
        state: &InstanceState,
    ) -> Result<Box<dyn Finder>> {
        let factory = self
            .factories
            .get(transport)
            .ok_or_else(|| Error::UnknownTransport(transport.clone()))?;
        Ok(factory.create(state))
    }
}
