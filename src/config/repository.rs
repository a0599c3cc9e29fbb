//! Repository index (the provisionable resource pool)

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::resource::ResourceEntry;
use crate::error::Result;
use crate::model::ResourceDescriptor;

/// A repository index file listing provisionable resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryIndex {
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

impl RepositoryIndex {
    pub fn from_file(path: &Path) -> Result<Self> {
        crate::config::read_descriptor(path)
    }

    /// Convert every entry into a descriptor.
    pub fn to_pool(&self) -> Result<Vec<Arc<ResourceDescriptor>>> {
        self.resources
            .iter()
            .map(ResourceEntry::to_descriptor)
            .collect()
    }

    /// Load several index files into one pool, in file order.
    pub fn load_pool(paths: &[impl AsRef<Path>]) -> Result<Vec<Arc<ResourceDescriptor>>> {
        let mut pool = Vec::new();
        for path in paths {
            pool.extend(Self::from_file(path.as_ref())?.to_pool()?);
        }
        Ok(pool)
    }
}
