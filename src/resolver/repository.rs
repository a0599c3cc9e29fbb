//! In-memory repository resolver
//!
//! The default [`ResolverBackend`]: resolves bundle-level requirements
//! against a fixed pool of resource descriptors, then closes transitively
//! over the package, service and bundle requirements of everything selected.
//!
//! Selection is deterministic: a by-value resource beats a repository
//! resource, and the highest in-range version beats lower ones.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Result, StowageError};
use crate::model::{
    BundleRequirement, ContentRequirement, PackageRequirement, ResourceDescriptor,
    ServiceRequirement,
};
use crate::resolver::backend::ResolverBackend;
use crate::resolver::refine::{RawRequirement, refine};
use crate::version::Version;

pub struct RepositoryResolver {
    pool: Vec<Arc<ResourceDescriptor>>,
}

impl RepositoryResolver {
    pub fn new(pool: Vec<Arc<ResourceDescriptor>>) -> Self {
        Self { pool }
    }
}

impl ResolverBackend for RepositoryResolver {
    fn resolve(
        &self,
        application: &str,
        version: &Version,
        by_value: &[Arc<ResourceDescriptor>],
        requirements: &[ContentRequirement],
    ) -> Result<Vec<Arc<ResourceDescriptor>>> {
        let app_identity = format!("{application}_{version}");
        debug!(
            application = %app_identity,
            requirements = requirements.len(),
            "resolving against repository pool"
        );

        let mut selection = Selection::new(by_value, &self.pool);
        let mut unsatisfied: Vec<(RawRequirement, String)> = Vec::new();
        let mut failing: Vec<Arc<ResourceDescriptor>> = Vec::new();

        // Requirements naming the same bundle must hold simultaneously, so
        // their ranges are intersected before selection. An empty
        // intersection means the same bundle was demanded at conflicting
        // versions.
        let (merged, conflicting) = merge_bundle_requirements(requirements);
        for requirement in &conflicting {
            unsatisfied.push((
                RawRequirement::Bundle(BundleRequirement::new(
                    &requirement.name,
                    requirement.range.clone(),
                )),
                app_identity.clone(),
            ));
        }

        for requirement in &merged {
            if selection.select_bundle(requirement).is_none() {
                unsatisfied.push((
                    RawRequirement::Bundle(BundleRequirement::new(
                        &requirement.name,
                        requirement.range.clone(),
                    )),
                    app_identity.clone(),
                ));
            }
        }

        // Walk the selection as a worklist; every newly selected provider is
        // itself closed over.
        let mut index = 0;
        while index < selection.selected.len() {
            let resource = selection.selected[index].clone();
            index += 1;

            for requirement in resource.required_bundles() {
                let as_content =
                    ContentRequirement::new(&requirement.name, requirement.range.clone());
                if selection.select_bundle(&as_content).is_none() {
                    unsatisfied.push((
                        RawRequirement::Bundle(requirement.clone()),
                        resource.identity(),
                    ));
                    push_unique(&mut failing, &resource);
                }
            }

            for requirement in resource.imported_packages() {
                if selection.satisfies_package(requirement) {
                    continue;
                }
                if selection.select_package_provider(requirement).is_none()
                    && !requirement.optional
                {
                    unsatisfied.push((
                        RawRequirement::Package(requirement.clone()),
                        resource.identity(),
                    ));
                    push_unique(&mut failing, &resource);
                }
            }

            for requirement in resource.imported_services() {
                if selection.satisfies_service(requirement) {
                    continue;
                }
                if selection.select_service_provider(requirement).is_none()
                    && !requirement.optional
                {
                    unsatisfied.push((
                        RawRequirement::Service(requirement.clone()),
                        resource.identity(),
                    ));
                    push_unique(&mut failing, &resource);
                }
            }
        }

        if !unsatisfied.is_empty() {
            warn!(
                application = %app_identity,
                count = unsatisfied.len(),
                "resolution failed with unsatisfied requirements"
            );
            return Err(StowageError::ResolutionFailed {
                application: app_identity,
                unsatisfied: refine(&unsatisfied, &failing),
            });
        }

        debug!(selected = selection.selected.len(), "resolution complete");
        Ok(selection.selected)
    }
}

/// Intersect same-name bundle requirements. Returns the merged set plus, for
/// names whose ranges do not intersect, every conflicting constituent.
fn merge_bundle_requirements(
    requirements: &[ContentRequirement],
) -> (Vec<ContentRequirement>, Vec<ContentRequirement>) {
    let mut by_name: std::collections::BTreeMap<&str, Vec<&ContentRequirement>> =
        std::collections::BTreeMap::new();
    for requirement in requirements {
        by_name.entry(&requirement.name).or_default().push(requirement);
    }

    let mut merged = Vec::new();
    let mut conflicting = Vec::new();
    for (name, group) in by_name {
        let mut range = Some(group[0].range.clone());
        for requirement in &group[1..] {
            range = range.and_then(|current| current.intersect(&requirement.range));
        }
        match range {
            Some(range) => merged.push(ContentRequirement::new(name, range)),
            None => conflicting.extend(group.into_iter().cloned()),
        }
    }
    (merged, conflicting)
}

fn push_unique(resources: &mut Vec<Arc<ResourceDescriptor>>, resource: &Arc<ResourceDescriptor>) {
    if !resources
        .iter()
        .any(|existing| existing.identity() == resource.identity())
    {
        resources.push(resource.clone());
    }
}

struct Selection<'a> {
    by_value: &'a [Arc<ResourceDescriptor>],
    repository: &'a [Arc<ResourceDescriptor>],
    selected: Vec<Arc<ResourceDescriptor>>,
    identities: HashSet<String>,
}

impl<'a> Selection<'a> {
    fn new(by_value: &'a [Arc<ResourceDescriptor>], repository: &'a [Arc<ResourceDescriptor>]) -> Self {
        Self {
            by_value,
            repository,
            selected: Vec::new(),
            identities: HashSet::new(),
        }
    }

    fn push(&mut self, resource: Arc<ResourceDescriptor>) {
        if self.identities.insert(resource.identity()) {
            debug!(bundle = %resource.identity(), "selected");
            self.selected.push(resource);
        }
    }

    /// Select a resource for a bundle-level requirement, reusing one already
    /// selected when possible. By-value resources win over the repository,
    /// then the highest in-range version wins.
    fn select_bundle(&mut self, requirement: &ContentRequirement) -> Option<Arc<ResourceDescriptor>> {
        if let Some(existing) = self
            .selected
            .iter()
            .find(|resource| requirement.matches(resource))
        {
            return Some(existing.clone());
        }
        let candidate = best_match(self.by_value, |resource| requirement.matches(resource))
            .or_else(|| best_match(self.repository, |resource| requirement.matches(resource)))?;
        self.push(candidate.clone());
        Some(candidate)
    }

    fn satisfies_package(&self, requirement: &PackageRequirement) -> bool {
        self.selected
            .iter()
            .any(|resource| resource.satisfies_package(requirement))
    }

    fn select_package_provider(
        &mut self,
        requirement: &PackageRequirement,
    ) -> Option<Arc<ResourceDescriptor>> {
        let candidate = best_match(self.by_value, |resource| {
            resource.satisfies_package(requirement)
        })
        .or_else(|| {
            best_match(self.repository, |resource| {
                resource.satisfies_package(requirement)
            })
        })?;
        self.push(candidate.clone());
        Some(candidate)
    }

    fn satisfies_service(&self, requirement: &ServiceRequirement) -> bool {
        self.selected
            .iter()
            .any(|resource| resource.satisfies_service(requirement))
    }

    fn select_service_provider(
        &mut self,
        requirement: &ServiceRequirement,
    ) -> Option<Arc<ResourceDescriptor>> {
        let candidate = best_match(self.by_value, |resource| {
            resource.satisfies_service(requirement)
        })
        .or_else(|| {
            best_match(self.repository, |resource| {
                resource.satisfies_service(requirement)
            })
        })?;
        self.push(candidate.clone());
        Some(candidate)
    }
}

/// The highest-versioned resource in `pool` accepted by `matches`.
fn best_match(
    pool: &[Arc<ResourceDescriptor>],
    matches: impl Fn(&ResourceDescriptor) -> bool,
) -> Option<Arc<ResourceDescriptor>> {
    pool.iter()
        .filter(|resource| matches(resource))
        .max_by(|a, b| a.version().cmp(b.version()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PackageCapability, ServiceCapability};
    use crate::version::VersionRange;

    fn range(s: &str) -> VersionRange {
        VersionRange::parse(s).unwrap()
    }

    fn bundle(name: &str, version: (u64, u64, u64)) -> Arc<ResourceDescriptor> {
        Arc::new(ResourceDescriptor::new(
            name,
            Version::new(version.0, version.1, version.2),
        ))
    }

    fn resolve_names(
        resolver: &RepositoryResolver,
        by_value: &[Arc<ResourceDescriptor>],
        requirements: &[ContentRequirement],
    ) -> Vec<String> {
        let mut names: Vec<String> = resolver
            .resolve("app", &Version::new(1, 0, 0), by_value, requirements)
            .unwrap()
            .iter()
            .map(|resource| resource.identity())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_selects_highest_in_range_version() {
        let resolver = RepositoryResolver::new(vec![
            bundle("lib", (1, 0, 0)),
            bundle("lib", (1, 5, 0)),
            bundle("lib", (2, 0, 0)),
        ]);
        let names = resolve_names(
            &resolver,
            &[],
            &[ContentRequirement::new("lib", range("[1.0.0,2.0.0)"))],
        );
        assert_eq!(names, vec!["lib_1.5.0"]);
    }

    #[test]
    fn test_by_value_wins_over_repository() {
        let by_value = vec![bundle("lib", (1, 0, 0))];
        let resolver = RepositoryResolver::new(vec![bundle("lib", (1, 5, 0))]);
        let names = resolve_names(
            &resolver,
            &by_value,
            &[ContentRequirement::new("lib", range("[1.0.0,2.0.0)"))],
        );
        assert_eq!(names, vec!["lib_1.0.0"]);
    }

    #[test]
    fn test_transitive_package_closure() {
        let app = Arc::new(
            ResourceDescriptor::new("app.core", Version::new(1, 0, 0))
                .with_imported_package(PackageRequirement::new("log.api", range("[1.0.0,2.0.0)"))),
        );
        let logging = Arc::new(
            ResourceDescriptor::new("logging", Version::new(1, 4, 0))
                .with_exported_package(PackageCapability::new("log.api", Version::new(1, 4, 0)))
                .with_imported_package(PackageRequirement::new("sys.io", range("1.0.0"))),
        );
        let sys = Arc::new(
            ResourceDescriptor::new("sys", Version::new(1, 1, 0))
                .with_exported_package(PackageCapability::new("sys.io", Version::new(1, 1, 0))),
        );
        let resolver = RepositoryResolver::new(vec![logging, sys]);
        let names = resolve_names(
            &resolver,
            std::slice::from_ref(&app),
            &[ContentRequirement::new("app.core", range("1.0.0"))],
        );
        assert_eq!(names, vec!["app.core_1.0.0", "logging_1.4.0", "sys_1.1.0"]);
    }

    #[test]
    fn test_optional_import_does_not_fail() {
        let app = Arc::new(
            ResourceDescriptor::new("app.core", Version::new(1, 0, 0)).with_imported_package(
                PackageRequirement::new("absent", range("1.0.0")).optional(),
            ),
        );
        let resolver = RepositoryResolver::new(vec![]);
        let names = resolve_names(
            &resolver,
            std::slice::from_ref(&app),
            &[ContentRequirement::new("app.core", range("1.0.0"))],
        );
        assert_eq!(names, vec!["app.core_1.0.0"]);
    }

    #[test]
    fn test_unsatisfied_bundle_requirement() {
        let resolver = RepositoryResolver::new(vec![]);
        let err = resolver
            .resolve(
                "app",
                &Version::new(1, 0, 0),
                &[],
                &[ContentRequirement::new("missing", range("[1.0.0,2.0.0)"))],
            )
            .unwrap_err();
        match err {
            StowageError::ResolutionFailed { unsatisfied, .. } => {
                assert_eq!(unsatisfied.len(), 1);
                assert_eq!(
                    unsatisfied[0].to_string(),
                    "Unable to resolve bundle missing version 1.0.0 (inclusive) to 2.0.0 (exclusive) \
                     required by bundle app_1.0.0"
                );
            }
            other => panic!("expected ResolutionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_unsatisfied_package_names_requirer() {
        let app = Arc::new(
            ResourceDescriptor::new("app.core", Version::new(1, 0, 0))
                .with_imported_package(PackageRequirement::new("absent", range("1.0.0"))),
        );
        let resolver = RepositoryResolver::new(vec![]);
        let err = resolver
            .resolve(
                "app",
                &Version::new(1, 0, 0),
                std::slice::from_ref(&app),
                &[ContentRequirement::new("app.core", range("1.0.0"))],
            )
            .unwrap_err();
        match err {
            StowageError::ResolutionFailed { unsatisfied, .. } => {
                assert_eq!(unsatisfied.len(), 1);
                assert_eq!(unsatisfied[0].name, "absent");
                assert_eq!(unsatisfied[0].requirers, vec!["app.core_1.0.0"]);
            }
            other => panic!("expected ResolutionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_service_import_satisfied_by_pool() {
        let app = Arc::new(
            ResourceDescriptor::new("app.core", Version::new(1, 0, 0))
                .with_imported_service(ServiceRequirement::new("payments")),
        );
        let provider = Arc::new(
            ResourceDescriptor::new("payments.impl", Version::new(1, 0, 0))
                .with_exported_service(ServiceCapability::new("payments")),
        );
        let resolver = RepositoryResolver::new(vec![provider]);
        let names = resolve_names(
            &resolver,
            std::slice::from_ref(&app),
            &[ContentRequirement::new("app.core", range("1.0.0"))],
        );
        assert_eq!(names, vec!["app.core_1.0.0", "payments.impl_1.0.0"]);
    }

    #[test]
    fn test_overlapping_requirements_merge_before_selection() {
        let resolver =
            RepositoryResolver::new(vec![bundle("lib", (1, 2, 0)), bundle("lib", (1, 4, 0))]);
        let names = resolve_names(
            &resolver,
            &[],
            &[
                ContentRequirement::new("lib", range("[1.0.0,2.0.0)")),
                ContentRequirement::exact("lib", Version::new(1, 2, 0)),
            ],
        );
        // the exact constraint narrows the wide requirement to one version
        assert_eq!(names, vec!["lib_1.2.0"]);
    }

    #[test]
    fn test_conflicting_same_name_requirements_fail() {
        let resolver =
            RepositoryResolver::new(vec![bundle("lib", (1, 0, 0)), bundle("lib", (2, 0, 0))]);
        let err = resolver
            .resolve(
                "app",
                &Version::new(1, 0, 0),
                &[],
                &[
                    ContentRequirement::exact("lib", Version::new(1, 0, 0)),
                    ContentRequirement::exact("lib", Version::new(2, 0, 0)),
                ],
            )
            .unwrap_err();
        match err {
            StowageError::ResolutionFailed { unsatisfied, .. } => {
                assert_eq!(unsatisfied.len(), 2);
                assert!(unsatisfied.iter().all(|item| item.name == "lib"));
            }
            other => panic!("expected ResolutionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_requirements_resolve_pinned_versions() {
        let resolver =
            RepositoryResolver::new(vec![bundle("lib", (1, 0, 0)), bundle("lib", (1, 5, 0))]);
        let names = resolve_names(
            &resolver,
            &[],
            &[ContentRequirement::exact("lib", Version::new(1, 0, 0))],
        );
        assert_eq!(names, vec!["lib_1.0.0"]);
    }
}
