//! Check command implementation
//!
//! Resolves like `resolve` but only reports the partition; nothing is
//! written. The manifest is still rendered so every validation the resolve
//! path performs also runs here.

use crate::cli::CheckArgs;
use crate::commands::helpers::{parse_constraints, print_partition};
use crate::config::{ApplicationDescriptor, RepositoryIndex};
use crate::error::Result;
use crate::manifest::DeploymentManifest;
use crate::resolver::{ClosureBuilder, RepositoryResolver};

pub fn run(args: CheckArgs) -> Result<()> {
    let descriptor = ApplicationDescriptor::from_file(&args.application)?;
    let mut request = descriptor.to_request()?;
    request.constraints = parse_constraints(&args.constraint)?;

    let pool = RepositoryIndex::load_pool(&args.repository)?;
    let backend = RepositoryResolver::new(pool);
    let deployed = ClosureBuilder::new(&backend).build(&request)?;

    DeploymentManifest::from_deployed(&request.application, &request.version, &deployed)?;
    print_partition(&deployed);
    Ok(())
}
