//! Resource entries shared by application and repository descriptors

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, invalid_descriptor};
use crate::model::{
    BundleRequirement, PackageCapability, PackageRequirement, ResourceDescriptor,
    ServiceCapability, ServiceRequirement,
};
use crate::version::{VersionRange, parse_lenient};

/// One resource in a descriptor: a by-value bundle of an application archive
/// or a provisionable entry of a repository index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub exports: ExportsEntry,

    #[serde(default)]
    pub imports: ImportsEntry,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportsEntry {
    #[serde(default)]
    pub packages: Vec<PackageExportEntry>,

    #[serde(default)]
    pub services: Vec<ServiceExportEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportsEntry {
    #[serde(default)]
    pub packages: Vec<PackageImportEntry>,

    #[serde(default)]
    pub services: Vec<ServiceImportEntry>,

    #[serde(default)]
    pub bundles: Vec<BundleImportEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageExportEntry {
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceExportEntry {
    pub name: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageImportEntry {
    pub name: String,

    /// A version range string; absent means any version.
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceImportEntry {
    pub name: String,

    #[serde(default)]
    pub multiple: bool,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleImportEntry {
    pub name: String,

    /// A version range string; absent means any version.
    #[serde(default)]
    pub version: Option<String>,
}

impl ServiceImportEntry {
    pub fn to_requirement(&self) -> ServiceRequirement {
        let mut requirement = ServiceRequirement::new(&self.name);
        if self.multiple {
            requirement = requirement.multiple();
        }
        if self.optional {
            requirement = requirement.optional();
        }
        requirement.attributes = self.attributes.clone();
        requirement
    }
}

fn parse_range(version: Option<&str>) -> Result<VersionRange> {
    match version {
        Some(text) => VersionRange::parse(text),
        None => Ok(VersionRange::at_least(crate::version::Version::new(0, 0, 0))),
    }
}

impl ResourceEntry {
    /// Build the immutable descriptor this entry describes.
    pub fn to_descriptor(&self) -> Result<Arc<ResourceDescriptor>> {
        if self.name.trim().is_empty() {
            return Err(invalid_descriptor("resource entry without a name"));
        }

        let version = parse_lenient(self.version.as_deref().unwrap_or_default())?;
        let mut resource = ResourceDescriptor::new(&self.name, version);

        for export in &self.exports.packages {
            let mut capability = PackageCapability::new(
                &export.name,
                parse_lenient(export.version.as_deref().unwrap_or_default())?,
            );
            capability.attributes = export.attributes.clone();
            resource = resource.with_exported_package(capability);
        }
        for export in &self.exports.services {
            let mut capability = ServiceCapability::new(&export.name);
            capability.attributes = export.attributes.clone();
            resource = resource.with_exported_service(capability);
        }
        for import in &self.imports.packages {
            let mut requirement =
                PackageRequirement::new(&import.name, parse_range(import.version.as_deref())?);
            if import.optional {
                requirement = requirement.optional();
            }
            resource = resource.with_imported_package(requirement);
        }
        for import in &self.imports.services {
            resource = resource.with_imported_service(import.to_requirement());
        }
        for import in &self.imports.bundles {
            resource = resource.with_required_bundle(BundleRequirement::new(
                &import.name,
                parse_range(import.version.as_deref())?,
            ));
        }

        Ok(Arc::new(resource))
    }
}
