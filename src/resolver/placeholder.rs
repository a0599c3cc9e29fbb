//! Synthetic service-stub resource
//!
//! Service imports declared by the application itself have no backing bundle,
//! so resolution would fail on them. A synthetic resource exporting exactly
//! those services is added to the by-value pool under a reserved name and
//! pruned from every result set before partitioning.

use std::sync::Arc;

use crate::model::{ResourceDescriptor, ServiceCapability, ServiceRequirement};
use crate::version::Version;

/// Reserved symbolic name of the synthetic service stub.
pub const PLACEHOLDER_NAME: &str = "stowage.internal.import-service.stub";

/// Build the stub resource exporting one service per declared import.
pub fn service_stub(import_services: &[ServiceRequirement]) -> Arc<ResourceDescriptor> {
    let mut resource = ResourceDescriptor::new(PLACEHOLDER_NAME, Version::new(1, 0, 0));
    for import in import_services {
        let mut capability = ServiceCapability::new(&import.name);
        capability.attributes = import.attributes.clone();
        capability = capability.with_attribute("service.imported", "true");
        resource = resource.with_exported_service(capability);
    }
    Arc::new(resource)
}

pub fn is_placeholder(resource: &ResourceDescriptor) -> bool {
    resource.symbolic_name() == PLACEHOLDER_NAME
}

/// Remove the stub from a result set, if present.
pub fn prune(resources: &mut Vec<Arc<ResourceDescriptor>>) {
    if let Some(index) = resources.iter().position(|r| is_placeholder(r)) {
        resources.remove(index);
    }
}
