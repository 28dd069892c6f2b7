//! Effective address and FQDN resolution for provisioned instances.

use crate::finder::FinderRegistry;
use crate::pinger::Pinger;
use crate::state::InstanceState;
use galley_common::types::Instance;
use galley_common::{Error, Result};
use std::sync::Arc;
use tracing::{debug, trace};

/// Placeholder hostnames meaning "discover the real address".
///
/// Matched literally; other loopback spellings are taken at face
/// value like any declared hostname.
const LOOPBACK_PLACEHOLDERS: [&str; 2] = ["127.0.0.1", "localhost"];

/// Resolves the effective network address and FQDN of an instance.
///
/// The hostname persisted for an instance may be a loopback
/// placeholder, in which case the real address is discovered through
/// the transport layer and confirmed with a reachability probe. The
/// finder may report several candidates (multiple NICs, NAT-forwarded
/// ports) of which only one answers from here.
pub struct AddressResolver {
    registry: Arc<FinderRegistry>,
    pinger: Arc<dyn Pinger>,
}

impl AddressResolver {
    /// Create a resolver over the given finder registry and pinger.
    pub fn new(registry: Arc<FinderRegistry>, pinger: Arc<dyn Pinger>) -> Self {
        Self { registry, pinger }
    }

    /// Resolve the effective address for `instance`.
    ///
    /// A hostname other than a loopback placeholder is returned
    /// verbatim with no network traffic. Returns `Ok(None)` when
    /// discovery ran but no candidate answered a probe.
    ///
    /// # Errors
    /// Returns `Error::AddressDiscoveryFailed` if the finder yields no
    /// candidates at all.
    pub async fn resolve_address(
        &self,
        instance: &Instance,
        state: &InstanceState,
    ) -> Result<Option<String>> {
        if !is_loopback_placeholder(&state.hostname) {
            trace!(
                instance = %instance.name,
                hostname = %state.hostname,
                "using declared hostname"
            );
            return Ok(Some(state.hostname.clone()));
        }
        self.reachable_guest_address(instance, state).await
    }

    /// Resolve the FQDN for `instance`, best-effort.
    ///
    /// DNS may not be registered yet while an instance boots, so every
    /// failure on this path degrades to `None`.
    pub async fn resolve_fqdn(
        &self,
        instance: &Instance,
        state: &InstanceState,
    ) -> Option<String> {
        let merged = state.with_driver_credentials(&instance.driver);
        let finder = match self.registry.for_transport(&instance.transport, &merged) {
            Ok(finder) => finder,
            Err(error) => {
                debug!(instance = %instance.name, %error, "fqdn lookup skipped");
                return None;
            }
        };
        match finder.find_fqdn().await {
            Ok(fqdn) => Some(fqdn),
            Err(error) => {
                debug!(instance = %instance.name, %error, "fqdn lookup failed");
                None
            }
        }
    }

    /// Probe the finder's candidates and return the first reachable
    /// one.
    async fn reachable_guest_address(
        &self,
        instance: &Instance,
        state: &InstanceState,
    ) -> Result<Option<String>> {
        // inject driver creds for drivers that only learn them late
        let merged = state.with_driver_credentials(&instance.driver);
        let finder = self.registry.for_transport(&instance.transport, &merged)?;
        let candidates = finder.find_ips().await?;
        if candidates.is_empty() {
            return Err(Error::AddressDiscoveryFailed);
        }

        debug!(
            instance = %instance.name,
            count = candidates.len(),
            "probing candidate addresses"
        );
        for address in candidates {
            if address == "127.0.0.1" {
                continue;
            }
            if self.pinger.is_reachable(&address).await {
                debug!(instance = %instance.name, %address, "candidate reachable");
                return Ok(Some(address));
            }
            trace!(instance = %instance.name, %address, "candidate unreachable");
        }

        debug!(instance = %instance.name, "no candidate reachable");
        Ok(None)
    }
}

fn is_loopback_placeholder(hostname: &str) -> bool {
    LOOPBACK_PLACEHOLDERS.contains(&hostname)
}
