//! Deployment manifest rendering
//!
//! The closure's final artifact: a header map naming every deployed bundle at
//! its pinned version. Entries are `name;deployed-version=<version>`, sorted
//! by name so the same closure always renders the same text.

use std::sync::Arc;

use crate::error::{Result, StowageError};
use crate::model::ResourceDescriptor;
use crate::resolver::DeployedBundleSet;
use crate::version::Version;

pub const MANIFEST_VERSION: &str = "Manifest-Version";
pub const APPLICATION_SYMBOLIC_NAME: &str = "Application-SymbolicName";
pub const APPLICATION_VERSION: &str = "Application-Version";
pub const DEPLOYED_CONTENT: &str = "Deployed-Content";
pub const DEPLOYED_USE_BUNDLE: &str = "Deployed-Use-Bundle";
pub const PROVISION_BUNDLE: &str = "Provision-Bundle";
pub const DEPLOYED_IMPORT_SERVICE: &str = "Deployed-ImportService";
pub const IMPORT_PACKAGE: &str = "Import-Package";

/// An ordered set of deployment manifest headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentManifest {
    headers: Vec<(String, String)>,
}

impl DeploymentManifest {
    /// Build the manifest for a resolved bundle set.
    ///
    /// # Errors
    ///
    /// `StowageError::EmptyDeployment` when the content bucket is empty, and
    /// any error from computing the derived headers.
    pub fn from_deployed(
        application: &str,
        version: &Version,
        deployed: &DeployedBundleSet,
    ) -> Result<Self> {
        let mut headers = vec![(MANIFEST_VERSION.to_string(), "1.0".to_string())];

        let content = bundle_entries(deployed.content());
        if content.is_empty() {
            return Err(StowageError::EmptyDeployment {
                application: deployed.application().to_string(),
            });
        }
        headers.push((APPLICATION_SYMBOLIC_NAME.to_string(), application.to_string()));
        headers.push((APPLICATION_VERSION.to_string(), version.to_string()));
        headers.push((DEPLOYED_CONTENT.to_string(), content));

        let use_bundle = bundle_entries(deployed.use_bundles());
        if !use_bundle.is_empty() {
            headers.push((DEPLOYED_USE_BUNDLE.to_string(), use_bundle));
        }

        let provision = bundle_entries(deployed.provision());
        if !provision.is_empty() {
            headers.push((PROVISION_BUNDLE.to_string(), provision));
        }

        let import_services: Vec<String> = deployed
            .deployed_import_services()
            .iter()
            .map(crate::model::ServiceRequirement::deployment_string)
            .collect();
        if !import_services.is_empty() {
            headers.push((DEPLOYED_IMPORT_SERVICE.to_string(), import_services.join(",")));
        }

        let import_packages = deployed.import_package_entries()?;
        if !import_packages.is_empty() {
            headers.push((IMPORT_PACKAGE.to_string(), import_packages.join(",")));
        }

        Ok(Self { headers })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header == name)
            .map(|(_, value)| value.as_str())
    }

    /// Render as `Header: value` lines.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for (header, value) in &self.headers {
            text.push_str(header);
            text.push_str(": ");
            text.push_str(value);
            text.push('\n');
        }
        text
    }
}

fn bundle_entries(resources: &[Arc<ResourceDescriptor>]) -> String {
    let mut entries: Vec<String> = resources
        .iter()
        .map(|resource| {
            format!(
                "{};deployed-version={}",
                resource.symbolic_name(),
                resource.version()
            )
        })
        .collect();
    entries.sort();
    entries.join(",")
}
