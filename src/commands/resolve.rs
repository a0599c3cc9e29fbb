//! Resolve command implementation
//!
//! The full pipeline:
//! 1. Read the application descriptor and repository indexes
//! 2. Build the deployment closure (three resolver passes)
//! 3. Render the deployment manifest and write it to the output path

use console::Style;

use crate::cli::ResolveArgs;
use crate::commands::helpers::{parse_constraints, print_partition};
use crate::config::{ApplicationDescriptor, RepositoryIndex};
use crate::error::{Result, file_write_failed};
use crate::manifest::DeploymentManifest;
use crate::resolver::{ClosureBuilder, RepositoryResolver};

pub fn run(args: ResolveArgs) -> Result<()> {
    let descriptor = ApplicationDescriptor::from_file(&args.application)?;
    let mut request = descriptor.to_request()?;
    request.constraints = parse_constraints(&args.constraint)?;

    let pool = RepositoryIndex::load_pool(&args.repository)?;
    let backend = RepositoryResolver::new(pool);
    let deployed = ClosureBuilder::new(&backend).build(&request)?;

    let manifest = DeploymentManifest::from_deployed(&request.application, &request.version, &deployed)?;
    std::fs::write(&args.output, manifest.render())
        .map_err(|err| file_write_failed(args.output.display().to_string(), err.to_string()))?;

    print_partition(&deployed);
    println!(
        "{} {}",
        Style::new().bold().apply_to("Wrote"),
        args.output.display()
    );
    Ok(())
}
