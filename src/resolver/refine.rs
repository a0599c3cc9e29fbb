//! Unsatisfied-requirement refinement
//!
//! A failed resolve reports raw (requirement, requirer) pairs. Before they
//! reach the user the list is refined: pairs are grouped by requirement, and
//! any requirement that some capability of the involved resources could
//! satisfy is dropped — it is a transitive artifact of the failure, not a
//! root cause, and reporting it would be misleading noise.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{RequirementKind, UnsatisfiedRequirement};
use crate::model::{BundleRequirement, PackageRequirement, ResourceDescriptor, ServiceRequirement};

/// A requirement as raised by a resolver backend, before refinement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawRequirement {
    Package(PackageRequirement),
    Bundle(BundleRequirement),
    Service(ServiceRequirement),
    /// Fallback for backends with requirement kinds this model does not know.
    Other(String),
}

impl RawRequirement {
    fn is_satisfied_by(&self, resource: &ResourceDescriptor) -> bool {
        match self {
            Self::Package(requirement) => resource.satisfies_package(requirement),
            Self::Bundle(requirement) => {
                requirement.name == resource.symbolic_name()
                    && requirement.range.matches(resource.version())
            }
            Self::Service(requirement) => resource.satisfies_service(requirement),
            Self::Other(_) => false,
        }
    }

    fn into_unsatisfied(self, requirers: Vec<String>) -> UnsatisfiedRequirement {
        match self {
            Self::Package(requirement) => UnsatisfiedRequirement {
                kind: RequirementKind::Package,
                name: requirement.name,
                range: Some(requirement.range),
                requirers,
            },
            Self::Bundle(requirement) => UnsatisfiedRequirement {
                kind: RequirementKind::Bundle,
                name: requirement.name,
                range: Some(requirement.range),
                requirers,
            },
            Self::Service(requirement) => UnsatisfiedRequirement {
                kind: RequirementKind::Service,
                name: requirement.name,
                range: None,
                requirers,
            },
            Self::Other(raw) => UnsatisfiedRequirement {
                kind: RequirementKind::Other,
                name: raw,
                range: None,
                requirers,
            },
        }
    }
}

/// Refine raw failure pairs into the deduplicated, root-cause-only report.
///
/// `involved` carries the resources that raised the requirements; their
/// capabilities decide which requirements are transitive artifacts.
pub fn refine(
    raw: &[(RawRequirement, String)],
    involved: &[Arc<ResourceDescriptor>],
) -> Vec<UnsatisfiedRequirement> {
    let mut grouped: Vec<(RawRequirement, BTreeSet<String>)> = Vec::new();
    for (requirement, requirer) in raw {
        match grouped.iter_mut().find(|(existing, _)| existing == requirement) {
            Some((_, requirers)) => {
                requirers.insert(requirer.clone());
            }
            None => {
                let mut requirers = BTreeSet::new();
                requirers.insert(requirer.clone());
                grouped.push((requirement.clone(), requirers));
            }
        }
    }

    grouped.retain(|(requirement, _)| {
        !involved
            .iter()
            .any(|resource| requirement.is_satisfied_by(resource))
    });

    let mut refined: Vec<UnsatisfiedRequirement> = grouped
        .into_iter()
        .map(|(requirement, requirers)| {
            requirement.into_unsatisfied(requirers.into_iter().collect())
        })
        .collect();
    refined.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.requirers.cmp(&b.requirers)));
    refined
}
