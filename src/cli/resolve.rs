use clap::Parser;
use std::path::PathBuf;

/// Arguments for resolve command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Resolve against one repository:\n    stowage resolve app.yaml -r repo.yaml\n\n\
                  Resolve against several repositories:\n    stowage resolve app.yaml -r base.yaml -r extras.yaml\n\n\
                  Write the manifest somewhere else:\n    stowage resolve app.yaml -r repo.yaml -o target/deployment.mf")]
pub struct ResolveArgs {
    /// Application descriptor file (.yaml, .yml or .json)
    pub application: PathBuf,

    /// Repository index file; may be given several times
    #[arg(long, short = 'r', env = "STOWAGE_REPOSITORY")]
    pub repository: Vec<PathBuf>,

    /// Pin a bundle to an exact version, e.g. logging=1.4.0; may repeat
    #[arg(long, short = 'c')]
    pub constraint: Vec<String>,

    /// Output path for the deployment manifest
    #[arg(long, short = 'o', default_value = "deployment.mf")]
    pub output: PathBuf,
}
