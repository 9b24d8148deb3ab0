//! Collected project state

use crate::report::OriginalData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the collector learned about one project in one run
///
/// Produced once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Project name (the project directory's final component)
    pub project: String,
    /// When the scan was taken
    pub timestamp: DateTime<Utc>,
    /// Runtime dependencies from `package.json` (name -> version requirement)
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// Development dependencies from `package.json`
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    /// Peer dependencies from `package.json`
    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, String>,
    /// Output of `npm outdated --json`
    #[serde(default)]
    pub outdated: BTreeMap<String, OutdatedPackage>,
    /// Output of `npm audit --json`, kept verbatim
    #[serde(default)]
    pub vulnerabilities: serde_json::Value,
}

/// One entry of `npm outdated --json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutdatedPackage {
    /// Installed version (absent when the package is not installed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    /// Highest version satisfying the declared range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wanted: Option<String>,
    /// Latest published version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    /// Install location inside `node_modules`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Package that depends on this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent: Option<String>,
}

impl ScanResult {
    /// Create an empty scan for `project` stamped with the current time
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            timestamp: Utc::now(),
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
            peer_dependencies: BTreeMap::new(),
            outdated: BTreeMap::new(),
            vulnerabilities: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Total vulnerabilities reported by the audit
    ///
    /// Read from `metadata.vulnerabilities.total`; 0 when the audit carries
    /// no such field.
    pub fn vulnerability_total(&self) -> u64 {
        self.vulnerabilities
            .pointer("/metadata/vulnerabilities/total")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0)
    }

    /// Counts derived from the collected collections
    pub fn original_data(&self) -> OriginalData {
        OriginalData {
            dependencies_count: self.dependencies.len(),
            dev_dependencies_count: self.dev_dependencies.len(),
            outdated_count: self.outdated.len(),
            vulnerabilities_count: self.vulnerability_total(),
        }
    }
}
