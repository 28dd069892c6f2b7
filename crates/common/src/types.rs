//! Domain types used throughout the Galley provisioner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a provisioned test instance.
///
/// Unique per instance and stable for its lifetime. The name keys the
/// persisted connection state and names the emitted node descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceName(String);

impl InstanceName {
    /// Create an instance name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for InstanceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for InstanceName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<InstanceName> for String {
    fn from(name: InstanceName) -> String {
        name.0
    }
}

/// Identifier of the transport used to reach an instance (e.g. "ssh",
/// "winrm").
///
/// Keys the finder registry: each transport has its own way of
/// discovering guest addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transport(String);

impl Transport {
    /// Create a transport identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Transport {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Transport {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Full platform identifier of an instance (e.g. "ubuntu-18.04").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform(String);

impl Platform {
    /// Create a platform identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the full platform identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base platform name: the lower-cased prefix up to the first `-`.
    ///
    /// `"ubuntu-18.04"` yields `"ubuntu"`; an identifier without a
    /// hyphen is lower-cased whole.
    pub fn base(&self) -> String {
        self.0
            .split('-')
            .next()
            .unwrap_or(&self.0)
            .to_lowercase()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Credentials supplied by the driver, overriding persisted state.
///
/// Some drivers only learn the guest credentials after provisioning, so
/// these values win over whatever was persisted for the instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverCredentials {
    /// Username for the transport connection.
    pub username: Option<String>,
    /// Password for the transport connection.
    pub password: Option<String>,
}

/// One provisioned test target as the harness describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Unique instance name.
    pub name: InstanceName,
    /// Platform the instance runs.
    pub platform: Platform,
    /// Transport used to reach the instance.
    pub transport: Transport,
    /// Driver-supplied credential overrides.
    #[serde(default)]
    pub driver: DriverCredentials,
}

impl Instance {
    /// Create an instance description with no driver credentials.
    pub fn new(
        name: impl Into<InstanceName>,
        platform: impl Into<Platform>,
        transport: impl Into<Transport>,
    ) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
            transport: transport.into(),
            driver: DriverCredentials::default(),
        }
    }

    /// Set the driver credential overrides.
    pub fn with_driver(mut self, driver: DriverCredentials) -> Self {
        self.driver = driver;
        self
    }
}
