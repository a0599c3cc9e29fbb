//! Test fixtures and utilities for reducing test setup duplication.
//!
//! Provides short builders for resource descriptors and a scripted
//! [`ResolverBackend`] double that replays pre-programmed result queues, so
//! closure tests can drive every pass of the algorithm without a repository.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{
    ContentRequirement, PackageCapability, PackageRequirement, ResourceDescriptor,
    ServiceRequirement,
};
use crate::resolver::ResolverBackend;
use crate::version::{Version, VersionRange};

pub fn version(segments: (u64, u64, u64)) -> Version {
    Version::new(segments.0, segments.1, segments.2)
}

pub fn range(text: &str) -> VersionRange {
    VersionRange::parse(text).expect("test range must parse")
}

pub fn content_req(name: &str, range_text: &str) -> ContentRequirement {
    ContentRequirement::new(name, range(range_text))
}

pub fn bundle(name: &str, segments: (u64, u64, u64)) -> ResourceDescriptor {
    ResourceDescriptor::new(name, version(segments))
}

pub fn exports_package(
    resource: ResourceDescriptor,
    package: &str,
    segments: (u64, u64, u64),
) -> ResourceDescriptor {
    resource.with_exported_package(PackageCapability::new(package, version(segments)))
}

pub fn imports_package(
    resource: ResourceDescriptor,
    package: &str,
    range_text: &str,
) -> ResourceDescriptor {
    resource.with_imported_package(PackageRequirement::new(package, range(range_text)))
}

pub fn imports_service(resource: ResourceDescriptor, service: &str) -> ResourceDescriptor {
    resource.with_imported_service(ServiceRequirement::new(service))
}

/// A resolver double replaying a fixed queue of responses.
///
/// Each `resolve` call records the requirement set it was given and pops the
/// next scripted response; running out of responses is a test bug.
#[derive(Default)]
pub struct ScriptedResolver {
    responses: RefCell<VecDeque<Result<Vec<Arc<ResourceDescriptor>>>>>,
    calls: RefCell<Vec<Vec<ContentRequirement>>>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, resources: Vec<Arc<ResourceDescriptor>>) -> Self {
        self.responses.borrow_mut().push_back(Ok(resources));
        self
    }

    pub fn respond_err(self, error: crate::error::StowageError) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn call(&self, index: usize) -> Vec<ContentRequirement> {
        self.calls.borrow()[index].clone()
    }
}

impl ResolverBackend for ScriptedResolver {
    fn resolve(
        &self,
        _application: &str,
        _version: &Version,
        _by_value: &[Arc<ResourceDescriptor>],
        requirements: &[ContentRequirement],
    ) -> Result<Vec<Arc<ResourceDescriptor>>> {
        self.calls.borrow_mut().push(requirements.to_vec());
        self.responses
            .borrow_mut()
            .pop_front()
            .expect("scripted resolver ran out of responses")
    }
}
