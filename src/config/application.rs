//! Application descriptor (the archive's deployment request)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::resource::{ResourceEntry, ServiceImportEntry};
use crate::error::{Result, invalid_descriptor};
use crate::model::ContentRequirement;
use crate::resolver::DeploymentRequest;
use crate::version::parse_lenient;

/// The application descriptor file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDescriptor {
    pub application: ApplicationSection,

    /// Isolated application content entries.
    #[serde(default)]
    pub content: Vec<ContentEntry>,

    /// Shared, non-isolated use-bundle entries.
    #[serde(default, rename = "use-bundles")]
    pub use_bundles: Vec<ContentEntry>,

    /// Services the application imports from outside the deployment.
    #[serde(default, rename = "import-services")]
    pub import_services: Vec<ServiceImportEntry>,

    /// Bundles contained in the archive itself.
    #[serde(default)]
    pub bundles: Vec<ResourceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSection {
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,

    /// A version range string; absent means any version.
    #[serde(default)]
    pub version: Option<String>,
}

impl ApplicationDescriptor {
    pub fn from_file(path: &Path) -> Result<Self> {
        let descriptor: Self = crate::config::read_descriptor(path)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn validate(&self) -> Result<()> {
        if self.application.name.trim().is_empty() {
            return Err(invalid_descriptor("application name must not be empty"));
        }
        if self.content.is_empty() {
            return Err(invalid_descriptor(format!(
                "application '{}' declares no content entries",
                self.application.name
            )));
        }
        Ok(())
    }

    /// Turn the descriptor into the resolver's deployment request.
    pub fn to_request(&self) -> Result<DeploymentRequest> {
        let version = parse_lenient(self.application.version.as_deref().unwrap_or_default())?;
        let mut request = DeploymentRequest::new(&self.application.name, version);

        for entry in &self.content {
            request
                .content
                .push(ContentRequirement::parse(&entry.name, entry.version.as_deref())?);
        }
        for entry in &self.use_bundles {
            request
                .use_bundles
                .push(ContentRequirement::parse(&entry.name, entry.version.as_deref())?);
        }
        for entry in &self.import_services {
            request.import_services.push(entry.to_requirement());
        }
        for entry in &self.bundles {
            request.by_value.push(entry.to_descriptor()?);
        }

        Ok(request)
    }
}
