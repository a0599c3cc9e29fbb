//! Resource descriptors
//!
//! A `ResourceDescriptor` is one named, versioned unit in a candidate pool:
//! a bundle contained in the application archive, or an entry of a
//! repository index. Descriptors are immutable once built and shared as
//! `Arc<ResourceDescriptor>` across resolution passes.

use crate::model::capability::{PackageCapability, ServiceCapability};
use crate::model::requirement::{BundleRequirement, PackageRequirement, ServiceRequirement};
use crate::version::Version;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    symbolic_name: String,
    version: Version,
    exported_packages: Vec<PackageCapability>,
    exported_services: Vec<ServiceCapability>,
    imported_packages: Vec<PackageRequirement>,
    imported_services: Vec<ServiceRequirement>,
    required_bundles: Vec<BundleRequirement>,
}

impl ResourceDescriptor {
    pub fn new(symbolic_name: impl Into<String>, version: Version) -> Self {
        Self {
            symbolic_name: symbolic_name.into(),
            version,
            exported_packages: Vec::new(),
            exported_services: Vec::new(),
            imported_packages: Vec::new(),
            imported_services: Vec::new(),
            required_bundles: Vec::new(),
        }
    }

    pub fn with_exported_package(mut self, capability: PackageCapability) -> Self {
        self.exported_packages.push(capability);
        self
    }

    pub fn with_exported_service(mut self, capability: ServiceCapability) -> Self {
        self.exported_services.push(capability);
        self
    }

    pub fn with_imported_package(mut self, requirement: PackageRequirement) -> Self {
        self.imported_packages.push(requirement);
        self
    }

    pub fn with_imported_service(mut self, requirement: ServiceRequirement) -> Self {
        self.imported_services.push(requirement);
        self
    }

    pub fn with_required_bundle(mut self, requirement: BundleRequirement) -> Self {
        self.required_bundles.push(requirement);
        self
    }

    pub fn symbolic_name(&self) -> &str {
        &self.symbolic_name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The `name_version` identity used in manifests and diagnostics.
    pub fn identity(&self) -> String {
        format!("{}_{}", self.symbolic_name, self.version)
    }

    pub fn exported_packages(&self) -> &[PackageCapability] {
        &self.exported_packages
    }

    pub fn exported_services(&self) -> &[ServiceCapability] {
        &self.exported_services
    }

    pub fn imported_packages(&self) -> &[PackageRequirement] {
        &self.imported_packages
    }

    pub fn imported_services(&self) -> &[ServiceRequirement] {
        &self.imported_services
    }

    pub fn required_bundles(&self) -> &[BundleRequirement] {
        &self.required_bundles
    }

    /// True when any exported package satisfies the requirement.
    pub fn satisfies_package(&self, requirement: &PackageRequirement) -> bool {
        self.exported_packages
            .iter()
            .any(|capability| requirement.is_satisfied_by(capability))
    }

    /// True when any exported service satisfies the requirement.
    pub fn satisfies_service(&self, requirement: &ServiceRequirement) -> bool {
        self.exported_services
            .iter()
            .any(|capability| requirement.is_satisfied_by(capability))
    }
}
