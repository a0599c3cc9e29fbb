//! Capabilities exposed by resources

use std::collections::BTreeMap;

use crate::version::Version;

/// A package exported by a resource at a concrete version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageCapability {
    pub name: String,
    pub version: Version,
    pub attributes: BTreeMap<String, String>,
}

impl PackageCapability {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            attributes: BTreeMap::new(),
        }
    }

    /// Manifest entry form, e.g. `log.api;version=1.4.0`.
    pub fn deployment_string(&self) -> String {
        format!("{};version={}", self.name, self.version)
    }
}

/// A service exported by a resource, identified by service name plus
/// arbitrary attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceCapability {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
}

impl ServiceCapability {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
