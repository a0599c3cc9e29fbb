//! Deployment closure building
//!
//! Three resolver passes per deployment:
//!
//! 1. an optimistic pass over the full requirement union, partitioned into
//!    isolated content and shared bundles;
//! 2. when some use-bundle entries turned out redundant, a narrowed pass
//!    without them, so a stray entry can neither fail resolution nor
//!    over-constrain the validation;
//! 3. a sanity pass demanding exactly the shared resources by name and
//!    pinned version. Any extra resource the resolver pulls in here is, by
//!    construction, isolated content a shared bundle depends on — a
//!    dependency cycle across the isolation boundary.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, StowageError, Violation};
use crate::model::{ContentRequirement, ResourceDescriptor, ServiceRequirement};
use crate::resolver::backend::{PostResolveTransform, ResolverBackend};
use crate::resolver::partition::DeployedBundleSet;
use crate::resolver::placeholder;
use crate::version::Version;

/// Everything a deployment needs resolving: the application identity, its
/// declared requirements and the resources bundled inside the archive.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub application: String,
    pub version: Version,
    /// Isolated application content requirements.
    pub content: Vec<ContentRequirement>,
    /// Shared, non-isolated use-bundle requirements.
    pub use_bundles: Vec<ContentRequirement>,
    /// Extra constraints, e.g. from a manifest being re-validated.
    pub constraints: Vec<ContentRequirement>,
    /// Services the application imports from outside the deployment.
    pub import_services: Vec<ServiceRequirement>,
    /// Resources contained in the archive itself.
    pub by_value: Vec<Arc<ResourceDescriptor>>,
}

impl DeploymentRequest {
    pub fn new(application: impl Into<String>, version: Version) -> Self {
        Self {
            application: application.into(),
            version,
            content: Vec::new(),
            use_bundles: Vec::new(),
            constraints: Vec::new(),
            import_services: Vec::new(),
            by_value: Vec::new(),
        }
    }

    pub fn unique_name(&self) -> String {
        format!("{}_{}", self.application, self.version)
    }
}

pub struct ClosureBuilder<'a> {
    backend: &'a dyn ResolverBackend,
    transform: Option<&'a dyn PostResolveTransform>,
}

impl<'a> ClosureBuilder<'a> {
    pub fn new(backend: &'a dyn ResolverBackend) -> Self {
        Self {
            backend,
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: &'a dyn PostResolveTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Compute the deployment closure for `request`.
    ///
    /// # Errors
    ///
    /// `ResolutionFailed` from any pass, `EmptyDeployment` when the first
    /// pass provisions nothing, `CircularDependencies` when the sanity pass
    /// traces a shared bundle to an isolated export.
    pub fn build(&self, request: &DeploymentRequest) -> Result<DeployedBundleSet> {
        let application = request.unique_name();
        debug!(application = %application, "computing deployment closure");

        let content_requirements = dedup_requirements(&request.content);
        let use_requirements = dedup_requirements(&request.use_bundles);

        let mut to_resolve = Vec::new();
        extend_unique(&mut to_resolve, &use_requirements);
        extend_unique(&mut to_resolve, &content_requirements);
        extend_unique(&mut to_resolve, &request.constraints);

        let stub = placeholder::service_stub(&request.import_services);
        let mut pool = request.by_value.clone();
        pool.push(stub.clone());

        let mut resolved =
            self.backend
                .resolve(&request.application, &request.version, &pool, &to_resolve)?;
        placeholder::prune(&mut resolved);
        if resolved.is_empty() {
            return Err(StowageError::EmptyDeployment { application });
        }

        let mut deployed = DeployedBundleSet::partition(
            &application,
            &content_requirements,
            &use_requirements,
            std::slice::from_ref(&stub),
            resolved,
        );

        let required_use = deployed.required_use_bundles()?;
        if required_use.len() < use_requirements.len() {
            // Some use-bundle entries were redundant; resolve again with just
            // the ones an external requirement actually needs.
            let narrowed = narrow_use_bundles(&use_requirements, &required_use);
            debug!(
                kept = narrowed.len(),
                supplied = use_requirements.len(),
                "re-resolving without redundant use-bundle entries"
            );
            let mut to_resolve = Vec::new();
            extend_unique(&mut to_resolve, &content_requirements);
            extend_unique(&mut to_resolve, &narrowed);

            let mut resolved =
                self.backend
                    .resolve(&request.application, &request.version, &pool, &to_resolve)?;
            placeholder::prune(&mut resolved);
            // partition against the full use set: a narrowed-away target can
            // still arrive transitively and belongs in the use bucket
            deployed = DeployedBundleSet::partition(
                &application,
                &content_requirements,
                &use_requirements,
                std::slice::from_ref(&stub),
                resolved,
            );
        }

        // Sanity pass: demand exactly the shared resources back. Anything
        // extra means a shared bundle leans on isolated content.
        let shared = deployed.shared_bundles()?;
        let exact_requirements: Vec<ContentRequirement> = shared
            .iter()
            .map(|resource| {
                ContentRequirement::exact(resource.symbolic_name(), resource.version().clone())
            })
            .collect();
        let mut resolved_shared = self.backend.resolve(
            &request.application,
            &request.version,
            &pool,
            &exact_requirements,
        )?;
        placeholder::prune(&mut resolved_shared);

        let differences = find_differences(&resolved_shared, &shared);
        if !differences.is_empty() {
            debug!(
                ?differences,
                "sanity pass returned resources outside the expected shared set"
            );
            let violations = trace_violations(&resolved_shared, &differences);
            if !violations.is_empty() {
                return Err(StowageError::CircularDependencies {
                    application,
                    violations,
                });
            }
            // A difference no shared import can be traced to is accepted.
        }

        if let Some(transform) = self.transform {
            match transform.post_process(deployed.clone()) {
                Ok(next) => deployed = next,
                Err(unavailable) => {
                    debug!(reason = %unavailable, "post-resolve transform unavailable, keeping original result");
                }
            }
        }

        Ok(deployed)
    }
}

fn dedup_requirements(requirements: &[ContentRequirement]) -> Vec<ContentRequirement> {
    let mut unique = Vec::new();
    extend_unique(&mut unique, requirements);
    unique
}

fn extend_unique(target: &mut Vec<ContentRequirement>, items: &[ContentRequirement]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

/// The use-bundle requirements whose target is present among the required
/// use-bundle resources.
fn narrow_use_bundles(
    use_requirements: &[ContentRequirement],
    required_use: &[Arc<ResourceDescriptor>],
) -> Vec<ContentRequirement> {
    use_requirements
        .iter()
        .filter(|requirement| {
            required_use
                .iter()
                .any(|resource| requirement.matches(resource))
        })
        .cloned()
        .collect()
}

/// Identities present in the sanity-pass result but absent from the expected
/// shared set.
fn find_differences(
    resolved_shared: &[Arc<ResourceDescriptor>],
    expected: &[Arc<ResourceDescriptor>],
) -> Vec<String> {
    let expected_identities: Vec<String> =
        expected.iter().map(|resource| resource.identity()).collect();
    let mut suspects: Vec<String> = resolved_shared
        .iter()
        .map(|resource| resource.identity())
        .filter(|identity| !expected_identities.contains(identity))
        .collect();
    suspects.sort();
    suspects.dedup();
    suspects
}

/// For every shared resource of the sanity result, trace each package import
/// to the exports of the diffed (isolated) resources.
fn trace_violations(
    resolved_shared: &[Arc<ResourceDescriptor>],
    differences: &[String],
) -> Vec<Violation> {
    let mut isolated_exports: Vec<(String, Vec<&str>)> = resolved_shared
        .iter()
        .filter(|resource| differences.contains(&resource.identity()))
        .map(|resource| {
            let packages = resource
                .exported_packages()
                .iter()
                .map(|capability| capability.name.as_str())
                .collect();
            (resource.identity(), packages)
        })
        .collect();
    isolated_exports.sort_by(|a, b| a.0.cmp(&b.0));

    let mut shared: Vec<&Arc<ResourceDescriptor>> = resolved_shared
        .iter()
        .filter(|resource| !differences.contains(&resource.identity()))
        .collect();
    shared.sort_by_key(|resource| resource.identity());

    let mut violations: Vec<Violation> = Vec::new();
    for resource in shared {
        for import in resource.imported_packages() {
            let exporters: Vec<String> = isolated_exports
                .iter()
                .filter(|(_, packages)| packages.contains(&import.name.as_str()))
                .map(|(identity, _)| identity.clone())
                .collect();
            if exporters.is_empty() {
                continue;
            }
            let violation = Violation {
                shared_bundle: resource.identity(),
                package: import.name.clone(),
                exporters,
            };
            if !violations.contains(&violation) {
                violations.push(violation);
            }
        }
    }
    violations
}
