//! Descriptor file handling
//!
//! Two input files drive a resolution: the application descriptor (identity,
//! content and use-bundle entries, imported services, by-value bundles) and
//! one or more repository indexes (the provisionable resource pool). Both are
//! read from YAML or JSON, chosen by file extension.

pub mod application;
pub mod repository;
pub mod resource;

pub use application::ApplicationDescriptor;
pub use repository::RepositoryIndex;
pub use resource::ResourceEntry;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Result, StowageError, config_parse_failed, config_read_failed};

/// Read and parse a descriptor file, dispatching on the file extension.
pub(crate) fn read_descriptor<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| config_read_failed(path.display().to_string(), err.to_string()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&text)
            .map_err(|err| config_parse_failed(path.display().to_string(), err.to_string())),
        "json" => serde_json::from_str(&text)
            .map_err(|err| config_parse_failed(path.display().to_string(), err.to_string())),
        _ => Err(StowageError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_descriptor_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repo.toml");
        std::fs::write(&path, "resources: []").unwrap();
        let result: Result<RepositoryIndex> = read_descriptor(&path);
        assert!(matches!(
            result.unwrap_err(),
            StowageError::UnsupportedFormat { .. }
        ));
    }

    #[test]
    fn test_read_descriptor_missing_file() {
        let result: Result<RepositoryIndex> = read_descriptor(Path::new("/nonexistent/repo.yaml"));
        assert!(matches!(
            result.unwrap_err(),
            StowageError::ConfigReadFailed { .. }
        ));
    }

    #[test]
    fn test_read_descriptor_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repo.json");
        std::fs::write(&path, r#"{"resources": [{"name": "lib", "version": "1.0.0"}]}"#).unwrap();
        let index: RepositoryIndex = read_descriptor(&path).unwrap();
        assert_eq!(index.resources.len(), 1);
    }
}
