//! Reachability probing for candidate addresses.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace};

/// Default probe timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Probes whether an address answers on the network.
#[async_trait]
pub trait Pinger: Send + Sync {
    /// True when the address responds to a probe.
    async fn is_reachable(&self, address: &str) -> bool;
}

/// Pinger shelling out to the system `ping` utility.
///
/// Sends a single echo request. Spawn failures, non-zero exits, and
/// timeouts all count as unreachable.
#[derive(Debug, Clone)]
pub struct ExternalPinger {
    timeout: Duration,
}

impl ExternalPinger {
    /// Create a pinger with the default timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a pinger with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ExternalPinger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pinger for ExternalPinger {
    async fn is_reachable(&self, address: &str) -> bool {
        let mut cmd = Command::new("ping");
        #[cfg(windows)]
        cmd.args(["-n", "1"]);
        #[cfg(not(windows))]
        cmd.args(["-c", "1"]);
        cmd.arg(address)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let reachable = match tokio::time::timeout(self.timeout, cmd.status()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(error)) => {
                debug!(%address, %error, "ping could not be spawned");
                false
            }
            Err(_) => false,
        };
        trace!(%address, reachable, "reachability probe");
        reachable
    }
}
