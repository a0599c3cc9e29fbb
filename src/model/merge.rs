//! Package requirement merging
//!
//! When several content bundles import the same package, the deployment
//! manifest carries a single entry whose range is the intersection of every
//! constituent range. An empty intersection marks the package name invalid;
//! the merged requirement is optional only when every constituent was.

use std::collections::BTreeMap;

use crate::model::requirement::PackageRequirement;

/// Outcome of merging a set of package requirements by name.
#[derive(Debug, Clone, Default)]
pub struct MergedRequirements {
    /// One requirement per package name, ranges intersected, sorted by name.
    pub merged: Vec<PackageRequirement>,
    /// Package names whose ranges had an empty intersection, sorted.
    pub invalid: Vec<String>,
}

impl MergedRequirements {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

pub fn merge_package_requirements(requirements: &[PackageRequirement]) -> MergedRequirements {
    let mut by_name: BTreeMap<&str, Vec<&PackageRequirement>> = BTreeMap::new();
    for requirement in requirements {
        by_name.entry(&requirement.name).or_default().push(requirement);
    }

    let mut result = MergedRequirements::default();
    for (name, group) in by_name {
        let mut range = Some(group[0].range.clone());
        for requirement in &group[1..] {
            range = range.and_then(|current| current.intersect(&requirement.range));
        }
        match range {
            Some(range) => {
                let mut merged = PackageRequirement::new(name, range);
                merged.optional = group.iter().all(|requirement| requirement.optional);
                result.merged.push(merged);
            }
            None => result.invalid.push(name.to_string()),
        }
    }
    result
}
