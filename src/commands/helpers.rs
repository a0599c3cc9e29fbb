//! Shared helpers for command implementations

use console::Style;

use crate::error::{Result, invalid_descriptor};
use crate::model::ContentRequirement;
use crate::resolver::DeployedBundleSet;
use crate::version::VersionRange;

/// Parse `name=version` constraint entries into exact-version requirements.
pub fn parse_constraints(entries: &[String]) -> Result<Vec<ContentRequirement>> {
    entries
        .iter()
        .map(|entry| {
            let (name, version) = entry.split_once('=').ok_or_else(|| {
                invalid_descriptor(format!(
                    "constraint '{entry}' must look like name=version"
                ))
            })?;
            Ok(ContentRequirement::new(
                name.trim(),
                VersionRange::parse_exact(version)?,
            ))
        })
        .collect()
}

/// Print one bucket as a styled header plus one identity per line.
fn print_bucket(label: &str, resources: &[std::sync::Arc<crate::model::ResourceDescriptor>]) {
    if resources.is_empty() {
        return;
    }
    println!("  {}", Style::new().bold().apply_to(label));
    for resource in resources {
        println!("    {}", resource.identity());
    }
}

/// Print the partition summary for a resolved deployment.
pub fn print_partition(deployed: &DeployedBundleSet) {
    println!(
        "{} {}",
        Style::new().bold().green().apply_to("Resolved"),
        Style::new().bold().apply_to(deployed.application())
    );
    print_bucket("Deployed content (isolated):", deployed.content());
    print_bucket("Use bundles (shared):", deployed.use_bundles());
    print_bucket("Provisioned bundles (shared):", deployed.provision());
}
