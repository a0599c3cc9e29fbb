//! External collaborator seams
//!
//! [`ResolverBackend`] is the contract the closure builder drives: given a
//! candidate pool and a set of bundle-level requirements, return the minimal
//! resource set satisfying them or fail with the refined unsatisfied list.
//! Each call is a fresh, blocking operation with no timeout and no retries.

use std::sync::Arc;

use thiserror::Error;

use crate::error::Result;
use crate::model::{ContentRequirement, ResourceDescriptor};
use crate::resolver::partition::DeployedBundleSet;
use crate::version::Version;

pub trait ResolverBackend {
    /// Resolve `requirements` against the backend's own pool plus the
    /// supplied by-value resources.
    ///
    /// # Errors
    ///
    /// `StowageError::ResolutionFailed` when any non-optional requirement
    /// cannot be satisfied.
    fn resolve(
        &self,
        application: &str,
        version: &Version,
        by_value: &[Arc<ResourceDescriptor>],
        requirements: &[ContentRequirement],
    ) -> Result<Vec<Arc<ResourceDescriptor>>>;
}

/// Failure of a [`PostResolveTransform`]: logged and swallowed, never fatal.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct TransformUnavailable {
    pub reason: String,
}

impl TransformUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Optional hook applied to the finished bundle set before it is returned.
pub trait PostResolveTransform {
    fn post_process(
        &self,
        deployed: DeployedBundleSet,
    ) -> std::result::Result<DeployedBundleSet, TransformUnavailable>;
}
