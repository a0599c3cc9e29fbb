//! Requirements declared by resources

use std::collections::BTreeMap;

use crate::model::capability::{PackageCapability, ServiceCapability};
use crate::version::VersionRange;

/// An imported package: name plus acceptable version range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRequirement {
    pub name: String,
    pub range: VersionRange,
    pub optional: bool,
}

impl PackageRequirement {
    pub fn new(name: impl Into<String>, range: VersionRange) -> Self {
        Self {
            name: name.into(),
            range,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn is_satisfied_by(&self, capability: &PackageCapability) -> bool {
        self.name == capability.name && self.range.matches(&capability.version)
    }

    /// Manifest entry form, e.g. `log.api;version=[1.0.0,2.0.0)`.
    pub fn deployment_string(&self) -> String {
        let mut entry = format!("{};version={}", self.name, self.range);
        if self.optional {
            entry.push_str(";resolution:=optional");
        }
        entry
    }
}

/// An imported service: matched by service name and attribute containment.
///
/// A `multiple` import accepts any number of providers and is always written
/// to the deployment manifest; a singular import is written only when the
/// isolated content cannot provide it internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceRequirement {
    pub name: String,
    pub multiple: bool,
    pub optional: bool,
    pub attributes: BTreeMap<String, String>,
}

impl ServiceRequirement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            multiple: false,
            optional: false,
            attributes: BTreeMap::new(),
        }
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Satisfied when the capability has the same service name and carries
    /// every attribute the requirement asks for.
    pub fn is_satisfied_by(&self, capability: &ServiceCapability) -> bool {
        self.name == capability.name
            && self
                .attributes
                .iter()
                .all(|(key, value)| capability.attributes.get(key) == Some(value))
    }

    /// Manifest entry form, e.g. `payments;region=eu`.
    pub fn deployment_string(&self) -> String {
        let mut entry = self.name.clone();
        for (key, value) in &self.attributes {
            entry.push_str(&format!(";{key}={value}"));
        }
        if self.multiple {
            entry.push_str(";multiple:=true");
        }
        entry
    }
}

/// A required bundle: name plus acceptable version range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleRequirement {
    pub name: String,
    pub range: VersionRange,
}

impl BundleRequirement {
    pub fn new(name: impl Into<String>, range: VersionRange) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}
