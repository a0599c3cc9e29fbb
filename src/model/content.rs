//! Bundle-level content requirements
//!
//! A `ContentRequirement` names a bundle and the version range an application
//! accepts for it. Identity is name plus range; attribute and directive maps
//! decorate a requirement without discriminating it.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::Result;
use crate::model::resource::ResourceDescriptor;
use crate::version::{Version, VersionRange};

#[derive(Debug, Clone)]
pub struct ContentRequirement {
    pub name: String,
    pub range: VersionRange,
    pub attributes: BTreeMap<String, String>,
    pub directives: BTreeMap<String, String>,
}

impl ContentRequirement {
    pub fn new(name: impl Into<String>, range: VersionRange) -> Self {
        Self {
            name: name.into(),
            range,
            attributes: BTreeMap::new(),
            directives: BTreeMap::new(),
        }
    }

    /// Parse from a name and range string; an absent range means any version.
    pub fn parse(name: impl Into<String>, range: Option<&str>) -> Result<Self> {
        let range = match range {
            Some(text) => VersionRange::parse(text)?,
            None => VersionRange::at_least(Version::new(0, 0, 0)),
        };
        Ok(Self::new(name, range))
    }

    /// The point-range requirement demanding exactly `version` of `name`.
    pub fn exact(name: impl Into<String>, version: Version) -> Self {
        Self::new(name, VersionRange::exact(version))
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_directive(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.directives.insert(key.into(), value.into());
        self
    }

    /// True when the resource's name and version satisfy this requirement.
    pub fn matches(&self, resource: &ResourceDescriptor) -> bool {
        self.name == resource.symbolic_name() && self.range.matches(resource.version())
    }
}

impl PartialEq for ContentRequirement {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.range == other.range
    }
}

impl Eq for ContentRequirement {}

impl Hash for ContentRequirement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.range.hash(state);
    }
}

impl fmt::Display for ContentRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};version={}", self.name, self.range)
    }
}
