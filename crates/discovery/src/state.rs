//! Persisted per-instance connection state.

use async_trait::async_trait;
use galley_common::types::{DriverCredentials, InstanceName};
use galley_common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io;
use std::path::PathBuf;
use tracing::trace;

/// Connection state persisted for one instance by the provisioning
/// step.
///
/// The hostname may be a loopback placeholder meaning the real address
/// must be discovered through the transport layer. Fields other than
/// the credentials are opaque to the resolver and passed through to
/// finders unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceState {
    /// Declared address, or a loopback placeholder.
    pub hostname: String,
    /// Username for the transport connection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password for the transport connection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Opaque additional fields (port, transport options, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InstanceState {
    /// Create a state carrying only a hostname.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            username: None,
            password: None,
            extra: Map::new(),
        }
    }

    /// Merged view of this state with driver credentials applied.
    ///
    /// A driver-supplied username or password wins over the persisted
    /// value when present and non-empty. Returns a new state; the
    /// persisted record is never modified.
    pub fn with_driver_credentials(&self, driver: &DriverCredentials) -> InstanceState {
        let mut merged = self.clone();
        if let Some(username) = non_empty(&driver.username) {
            merged.username = Some(username);
        }
        if let Some(password) = non_empty(&driver.password) {
            merged.password = Some(password);
        }
        merged
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Store of persisted per-instance connection state.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the persisted state for the named instance.
    ///
    /// # Errors
    /// Returns an error if no state exists or it cannot be read.
    async fn read(&self, instance: &InstanceName) -> Result<InstanceState>;
}

/// State store reading JSON files under a root directory.
///
/// State for instance `web01` lives at `{root}/web01.json`.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    root: PathBuf,
}

impl JsonStateStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn state_file(&self, instance: &InstanceName) -> PathBuf {
        self.root.join(format!("{}.json", instance))
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn read(&self, instance: &InstanceName) -> Result<InstanceState> {
        let path = self.state_file(instance);
        trace!(instance = %instance, path = %path.display(), "reading instance state");
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::StateNotFound(instance.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn driver(username: Option<&str>, password: Option<&str>) -> DriverCredentials {
        DriverCredentials {
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_driver_credentials_override() {
        let state = InstanceState {
            username: Some("kitchen".to_string()),
            password: Some("stale".to_string()),
            ..InstanceState::new("127.0.0.1")
        };
        let merged = state.with_driver_credentials(&driver(Some("vagrant"), Some("secret")));
        assert_eq!(merged.username.as_deref(), Some("vagrant"));
        assert_eq!(merged.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_absent_driver_credentials_preserved() {
        let state = InstanceState {
            username: Some("kitchen".to_string()),
            ..InstanceState::new("127.0.0.1")
        };
        let merged = state.with_driver_credentials(&driver(None, None));
        assert_eq!(merged.username.as_deref(), Some("kitchen"));
        assert!(merged.password.is_none());
    }

    #[test]
    fn test_empty_driver_credentials_ignored() {
        let state = InstanceState {
            username: Some("kitchen".to_string()),
            ..InstanceState::new("127.0.0.1")
        };
        let merged = state.with_driver_credentials(&driver(Some(""), None));
        assert_eq!(merged.username.as_deref(), Some("kitchen"));
    }

    #[test]
    fn test_merge_does_not_mutate_original() {
        let state = InstanceState::new("127.0.0.1");
        let _ = state.with_driver_credentials(&driver(Some("vagrant"), None));
        assert!(state.username.is_none());
    }

    #[test]
    fn test_extra_fields_roundtrip() {
        let raw = json!({
            "hostname": "10.0.0.5",
            "port": 2222,
            "ssh_key": "/tmp/key"
        });
        let state: InstanceState = serde_json::from_value(raw).unwrap();
        assert_eq!(state.hostname, "10.0.0.5");
        assert_eq!(state.extra["port"], 2222);

        let back = serde_json::to_value(&state).unwrap();
        assert_eq!(back["ssh_key"], "/tmp/key");
    }

    #[tokio::test]
    async fn test_json_store_reads_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web01.json");
        std::fs::write(
            &path,
            r#"{ "hostname": "192.168.1.5", "username": "kitchen", "port": 22 }"#,
        )
        .unwrap();

        let store = JsonStateStore::new(dir.path());
        let state = store.read(&InstanceName::new("web01")).await.unwrap();
        assert_eq!(state.hostname, "192.168.1.5");
        assert_eq!(state.username.as_deref(), Some("kitchen"));
        assert_eq!(state.extra["port"], 22);
    }

    #[tokio::test]
    async fn test_json_store_missing_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path());
        let err = store.read(&InstanceName::new("ghost")).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
