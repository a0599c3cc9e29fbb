//! Partitioning resolved resources into deployment buckets
//!
//! Every resolved resource lands in exactly one bucket, matched in order
//! against the application's content requirements (isolated), then its
//! use-bundle requirements (shared), falling back to provisioned (shared).
//! A `DeployedBundleSet` is an immutable snapshot; each resolution pass
//! partitions afresh instead of mutating an earlier set.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, StowageError};
use crate::model::{
    ContentRequirement, PackageRequirement, ResourceDescriptor, ServiceRequirement,
    merge_package_requirements,
};

#[derive(Debug, Clone)]
pub struct DeployedBundleSet {
    application: String,
    content: Vec<Arc<ResourceDescriptor>>,
    use_bundles: Vec<Arc<ResourceDescriptor>>,
    provision: Vec<Arc<ResourceDescriptor>>,
    placeholders: Vec<Arc<ResourceDescriptor>>,
}

impl DeployedBundleSet {
    /// Partition `resolved` against the application's requirements.
    ///
    /// `placeholders` are the synthetic service-stub resources; they never
    /// appear in a bucket but their exported services count as provided
    /// within the isolated content.
    pub fn partition(
        application: &str,
        content_requirements: &[ContentRequirement],
        use_requirements: &[ContentRequirement],
        placeholders: &[Arc<ResourceDescriptor>],
        resolved: Vec<Arc<ResourceDescriptor>>,
    ) -> Self {
        let mut content = Vec::new();
        let mut use_bundles = Vec::new();
        let mut provision = Vec::new();

        for resource in resolved {
            if content_requirements.iter().any(|req| req.matches(&resource)) {
                debug!(bundle = %resource.identity(), "partitioned into deployed content");
                content.push(resource);
            } else if use_requirements.iter().any(|req| req.matches(&resource)) {
                debug!(bundle = %resource.identity(), "partitioned into use-bundles");
                use_bundles.push(resource);
            } else {
                debug!(bundle = %resource.identity(), "partitioned into provisioned bundles");
                provision.push(resource);
            }
        }

        for bucket in [&mut content, &mut use_bundles, &mut provision] {
            bucket.sort_by_key(|resource| resource.identity());
            bucket.dedup_by_key(|resource| resource.identity());
        }

        Self {
            application: application.to_string(),
            content,
            use_bundles,
            provision,
            placeholders: placeholders.to_vec(),
        }
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    /// The isolated application content.
    pub fn content(&self) -> &[Arc<ResourceDescriptor>] {
        &self.content
    }

    /// Resources matched by a use-bundle requirement (shared).
    pub fn use_bundles(&self) -> &[Arc<ResourceDescriptor>] {
        &self.use_bundles
    }

    /// Resources pulled in by nothing but transitive needs (shared).
    pub fn provision(&self) -> &[Arc<ResourceDescriptor>] {
        &self.provision
    }

    /// All shared resources: provisioned plus the required use-bundles.
    pub fn shared_bundles(&self) -> Result<Vec<Arc<ResourceDescriptor>>> {
        let mut shared = self.provision.clone();
        for resource in self.required_use_bundles()? {
            if !shared
                .iter()
                .any(|existing| existing.identity() == resource.identity())
            {
                shared.push(resource);
            }
        }
        shared.sort_by_key(|resource| resource.identity());
        Ok(shared)
    }

    /// The subset of use-bundles whose exports satisfy an external package
    /// requirement of the content. Use-bundle entries outside this set were
    /// redundant.
    pub fn required_use_bundles(&self) -> Result<Vec<Arc<ResourceDescriptor>>> {
        let mut required: Vec<Arc<ResourceDescriptor>> = Vec::new();
        for requirement in self.external_package_requirements()? {
            let provider = self.use_bundles.iter().find(|resource| {
                resource
                    .exported_packages()
                    .iter()
                    .any(|capability| requirement.is_satisfied_by(capability))
            });
            if let Some(resource) = provider {
                if !required
                    .iter()
                    .any(|existing| existing.identity() == resource.identity())
                {
                    required.push(resource.clone());
                }
            }
        }
        required.sort_by_key(|resource| resource.identity());
        Ok(required)
    }

    /// Package imports of the content that no content bundle exports,
    /// merged by package name.
    ///
    /// # Errors
    ///
    /// `StowageError::IncompatibleRequirements` when two content bundles
    /// import the same package with non-intersecting ranges.
    pub fn external_package_requirements(&self) -> Result<Vec<PackageRequirement>> {
        let mut external = Vec::new();
        for bundle in &self.content {
            for requirement in bundle.imported_packages() {
                let satisfied_internally = self
                    .content
                    .iter()
                    .any(|provider| provider.satisfies_package(requirement));
                if !satisfied_internally {
                    external.push(requirement.clone());
                }
            }
        }

        let merged = merge_package_requirements(&external);
        if !merged.is_valid() {
            return Err(StowageError::IncompatibleRequirements {
                application: self.application.clone(),
                packages: merged.invalid,
            });
        }
        Ok(merged.merged)
    }

    /// Service imports of the content to carry into the deployment manifest:
    /// imports accepting multiple providers, plus singular imports no service
    /// exported within the isolated content (including the synthetic stubs)
    /// can satisfy.
    pub fn deployed_import_services(&self) -> Vec<ServiceRequirement> {
        let mut isolated_exports = Vec::new();
        for bundle in self.content.iter().chain(&self.placeholders) {
            isolated_exports.extend(bundle.exported_services().iter().cloned());
        }

        let mut deployed = Vec::new();
        for bundle in &self.content {
            for import in bundle.imported_services() {
                if deployed.contains(import) {
                    continue;
                }
                let provided_internally = isolated_exports
                    .iter()
                    .any(|capability| import.is_satisfied_by(capability));
                if import.multiple || !provided_internally {
                    deployed.push(import.clone());
                }
            }
        }
        deployed.sort_by_key(ServiceRequirement::deployment_string);
        deployed
    }

    /// Entries for the manifest's `Import-Package` header: requirements
    /// matched by a use-bundle export render as that export, the rest as the
    /// requirement itself.
    pub fn import_package_entries(&self) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        for requirement in self.external_package_requirements()? {
            let matched = self.use_bundles.iter().find_map(|resource| {
                resource
                    .exported_packages()
                    .iter()
                    .find(|capability| requirement.is_satisfied_by(capability))
            });
            let entry = match matched {
                Some(capability) => {
                    let mut entry = capability.deployment_string();
                    if requirement.optional {
                        entry.push_str(";resolution:=optional");
                    }
                    entry
                }
                None => requirement.deployment_string(),
            };
            entries.push(entry);
        }
        entries.sort();
        entries.dedup();
        Ok(entries)
    }
}
