use clap::Parser;
use std::path::PathBuf;

/// Arguments for check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Application descriptor file (.yaml, .yml or .json)
    pub application: PathBuf,

    /// Repository index file; may be given several times
    #[arg(long, short = 'r', env = "STOWAGE_REPOSITORY")]
    pub repository: Vec<PathBuf>,

    /// Pin a bundle to an exact version, e.g. logging=1.4.0; may repeat
    #[arg(long, short = 'c')]
    pub constraint: Vec<String>,
}
