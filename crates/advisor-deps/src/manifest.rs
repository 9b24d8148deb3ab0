//! package.json reader

use crate::error::{CollectError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// File name of the npm manifest
pub const MANIFEST_FILE: &str = "package.json";

/// The parts of `package.json` the collector reports
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    /// Package name, if declared
    #[serde(default)]
    pub name: Option<String>,

    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Development dependencies
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,

    /// Peer dependencies
    #[serde(default, rename = "peerDependencies")]
    pub peer_dependencies: BTreeMap<String, String>,
}

impl PackageJson {
    /// Read and parse the manifest at `path`
    pub async fn read(path: &Path) -> Result<Self> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CollectError::ManifestRead {
                    path: path.to_path_buf(),
                    source,
                })?;

        serde_json::from_str(&content).map_err(|source| CollectError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_package_json() {
        let temp_dir = TempDir::new().unwrap();
        let package_json = temp_dir.path().join(MANIFEST_FILE);
        std::fs::write(
            &package_json,
            r#"
{
  "name": "shop",
  "version": "1.0.0",
  "dependencies": {
    "react": "^18.0.0"
  },
  "devDependencies": {
    "typescript": "^5.0.0"
  }
}
"#,
        )
        .unwrap();

        let manifest = PackageJson::read(&package_json).await.unwrap();
        assert_eq!(manifest.name.as_deref(), Some("shop"));
        assert_eq!(manifest.dependencies["react"], "^18.0.0");
        assert_eq!(manifest.dev_dependencies["typescript"], "^5.0.0");
        assert!(manifest.peer_dependencies.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_package_json() {
        let temp_dir = TempDir::new().unwrap();
        let package_json = temp_dir.path().join(MANIFEST_FILE);
        std::fs::write(&package_json, "{ \"name\": ").unwrap();

        let result = PackageJson::read(&package_json).await;
        assert!(matches!(result, Err(CollectError::Manifest { .. })));
    }
}
