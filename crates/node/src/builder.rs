//! Assembles and persists node descriptors.

use crate::descriptor::{AutomaticAttributes, NodeDescriptor};
use galley_common::config::ProvisionerConfig;
use galley_common::types::{Instance, InstanceName};
use galley_common::Result;
use galley_discovery::resolver::AddressResolver;
use galley_discovery::state::{InstanceState, StateStore};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Prepares the node descriptor for an instance ahead of convergence.
///
/// Each preparation cycle fully replaces the previous descriptor: the
/// old file is removed before resolution starts, so a discovery
/// failure leaves no descriptor behind and the convergence tool fails
/// loudly instead of reading stale data.
pub struct NodePreparer {
    state_store: Arc<dyn StateStore>,
    resolver: AddressResolver,
    config: ProvisionerConfig,
}

impl NodePreparer {
    /// Create a preparer over the given collaborators.
    pub fn new(
        state_store: Arc<dyn StateStore>,
        resolver: AddressResolver,
        config: ProvisionerConfig,
    ) -> Self {
        Self {
            state_store,
            resolver,
            config,
        }
    }

    /// Build and write the descriptor for `instance`.
    ///
    /// Returns the path of the written descriptor.
    ///
    /// # Errors
    /// Returns an error if the persisted state cannot be read, if
    /// guest-address discovery yields no candidates, or if the file
    /// cannot be written.
    pub async fn prepare(&self, instance: &Instance) -> Result<PathBuf> {
        let path = self.node_file(&instance.name);
        info!(
            instance = %instance.name,
            path = %path.display(),
            "preparing node descriptor"
        );

        remove_stale(&path).await?;
        tokio::fs::create_dir_all(self.node_dir()).await?;

        let state = self.state_store.read(&instance.name).await?;
        let descriptor = self.build_descriptor(instance, &state).await?;
        write_pretty(&path, &descriptor).await?;

        info!(instance = %instance.name, "node descriptor written");
        Ok(path)
    }

    /// Directory node descriptors are written to.
    pub fn node_dir(&self) -> PathBuf {
        self.config.test_base_path.join("nodes")
    }

    /// Descriptor path for the named instance.
    pub fn node_file(&self, name: &InstanceName) -> PathBuf {
        self.node_dir().join(format!("{}.json", name))
    }

    async fn build_descriptor(
        &self,
        instance: &Instance,
        state: &InstanceState,
    ) -> Result<NodeDescriptor> {
        let ipaddress = self.resolver.resolve_address(instance, state).await?;
        let fqdn = self.resolver.resolve_fqdn(instance, state).await;
        Ok(NodeDescriptor {
            id: instance.name.to_string(),
            chef_environment: self.config.environment(),
            automatic: AutomaticAttributes {
                ipaddress,
                platform: instance.platform.base(),
                fqdn,
            },
            normal: self.config.attributes.clone(),
            run_list: self.config.run_list.clone(),
        })
    }
}

async fn remove_stale(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale descriptor");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Write the descriptor pretty-printed, via a temp file in the target
/// directory so a reader never observes a partial document.
async fn write_pretty(path: &Path, descriptor: &NodeDescriptor) -> Result<()> {
    let json = serde_json::to_string_pretty(descriptor)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use galley_discovery::finder::FinderRegistry;
    use galley_discovery::pinger::ExternalPinger;

    struct EmptyStateStore;

    #[async_trait::async_trait]
    impl StateStore for EmptyStateStore {
        async fn read(&self, instance: &InstanceName) -> Result<InstanceState> {
            Err(galley_common::Error::StateNotFound(instance.clone()))
        }
    }

    fn preparer(config: ProvisionerConfig) -> NodePreparer {
        let resolver = AddressResolver::new(
            Arc::new(FinderRegistry::new()),
            Arc::new(ExternalPinger::new()),
        );
        NodePreparer::new(Arc::new(EmptyStateStore), resolver, config)
    }

    #[test]
    fn test_node_file_layout() {
        let preparer = preparer(ProvisionerConfig::new("/tmp/galley/suite-default"));
        assert_eq!(
            preparer.node_file(&InstanceName::new("web01")),
            PathBuf::from("/tmp/galley/suite-default/nodes/web01.json")
        );
    }

    #[tokio::test]
    async fn test_prepare_surfaces_missing_state() {
        let dir = tempfile::tempdir().unwrap();
        let preparer = preparer(ProvisionerConfig::new(dir.path()));

        let instance = Instance::new("ghost", "ubuntu-18.04", "ssh");
        let err = preparer.prepare(&instance).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
