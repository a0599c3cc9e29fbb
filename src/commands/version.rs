//! Version command

use crate::error::Result;

pub fn run() -> Result<()> {
    println!("stowage {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
