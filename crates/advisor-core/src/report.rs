//! Analysis report model

use crate::command::update_command;
use crate::lenient;
use crate::scan::ScanResult;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which `package.json` section a recommendation targets
///
/// Anything the model sends other than a dev-dependency spelling reads as
/// [`DependencyKind::Dependency`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DependencyKind {
    /// `dependencies`
    #[default]
    #[serde(rename = "dependency")]
    Dependency,
    /// `devDependencies`
    #[serde(rename = "devDependency")]
    DevDependency,
}

impl DependencyKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Dependency => "dependency",
            DependencyKind::DevDependency => "devDependency",
        }
    }
}

impl<'de> Deserialize<'de> for DependencyKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match lenient::label(deserializer)? {
            Some(kind) if kind.starts_with("dev") => DependencyKind::DevDependency,
            _ => DependencyKind::Dependency,
        })
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Update urgency
///
/// A closed ordinal serialized as the integers 1, 2 and 3. Numeric strings
/// are accepted on input; any other value is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Priority {
    /// 1: critical security update
    Critical = 1,
    /// 2: major version update
    Major = 2,
    /// 3: minor or patch update
    Minor = 3,
}

impl Priority {
    /// Numeric value (1-3)
    pub fn value(self) -> u8 {
        self as u8
    }

    /// CSS class used to colour report rows
    pub fn css_class(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::Major => "major",
            Priority::Minor => "minor",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Critical),
            2 => Ok(Priority::Major),
            3 => Ok(Priority::Minor),
            other => Err(format!("priority must be 1, 2 or 3, got {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = lenient::integer(deserializer)?
            .ok_or_else(|| <D::Error as de::Error>::custom("priority must be 1, 2 or 3"))?;
        u8::try_from(value)
            .map_err(|_| format!("priority must be 1, 2 or 3, got {}", value))
            .and_then(Priority::try_from)
            .map_err(de::Error::custom)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.value()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Risk of applying an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    /// Low risk
    Low,
    /// Medium risk
    #[default]
    Medium,
    /// High risk
    High,
}

impl<'de> Deserialize<'de> for Risk {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match lenient::label(deserializer)?.as_deref() {
            Some("low" | "minimal") => Risk::Low,
            Some("high" | "critical" | "severe") => Risk::High,
            _ => Risk::Medium,
        })
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Risk::Low => "low",
            Risk::Medium => "medium",
            Risk::High => "high",
        })
    }
}

/// Security relevance of an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityImpact {
    /// No known security relevance
    #[default]
    None,
    /// Low security relevance
    Low,
    /// Fixes a serious vulnerability
    High,
}

impl<'de> Deserialize<'de> for SecurityImpact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match lenient::label(deserializer)?.as_deref() {
            Some("low" | "medium" | "moderate") => SecurityImpact::Low,
            Some("high" | "critical" | "severe") => SecurityImpact::High,
            _ => SecurityImpact::None,
        })
    }
}

/// A single ranked update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Package name
    pub package: String,
    /// Manifest section
    #[serde(rename = "type", default)]
    pub kind: DependencyKind,
    /// Currently used version, empty when the package is not installed
    #[serde(default, deserialize_with = "lenient::string")]
    pub current: String,
    /// Version to move to
    #[serde(deserialize_with = "lenient::string")]
    pub available: String,
    /// Urgency
    pub priority: Priority,
    /// Risk assessment
    #[serde(default)]
    pub risk: Risk,
    /// Short changelog summary
    #[serde(default, deserialize_with = "lenient::string")]
    pub changelog_summary: String,
    /// Test suites that should run after updating
    #[serde(default, deserialize_with = "lenient::strings")]
    pub testing_required: BTreeSet<String>,
    /// Security impact
    #[serde(default)]
    pub security_impact: SecurityImpact,
    /// Advisory identifiers (CVE, GHSA) fixed by the update
    #[serde(default, deserialize_with = "lenient::strings")]
    pub vulnerabilities: Vec<String>,
    /// Install command, always regenerated from the fields above
    #[serde(default, deserialize_with = "lenient::string")]
    pub update_command: String,
}

impl Recommendation {
    /// Rebuild `update_command` from `package`, `available` and `kind`
    pub fn regenerate_update_command(&mut self) {
        self.update_command = update_command(&self.package, &self.available, self.kind);
    }
}

/// Headline counters reported by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    /// Total dependencies considered
    #[serde(deserialize_with = "lenient::count")]
    pub total_dependencies: u64,
    /// Outdated packages
    #[serde(deserialize_with = "lenient::count")]
    pub outdated: u64,
    /// Priority 1 recommendations
    #[serde(deserialize_with = "lenient::count")]
    pub critical: u64,
    /// Priority 2 recommendations
    #[serde(deserialize_with = "lenient::count")]
    pub major: u64,
    /// Priority 3 recommendations
    #[serde(deserialize_with = "lenient::count")]
    pub minor: u64,
    /// Known vulnerabilities
    #[serde(deserialize_with = "lenient::count")]
    pub vulnerabilities: u64,
}

/// Counts taken from the scan itself rather than from the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalData {
    /// Number of runtime dependencies
    pub dependencies_count: usize,
    /// Number of development dependencies
    #[serde(rename = "devDependencies_count")]
    pub dev_dependencies_count: usize,
    /// Number of outdated packages
    pub outdated_count: usize,
    /// Audit vulnerability total
    pub vulnerabilities_count: u64,
}

/// The analyzed result of one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Project name
    #[serde(default, deserialize_with = "lenient::string")]
    pub project: String,
    /// When the analysis was produced
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: String,
    /// Ranked updates
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub recommendations: Vec<Recommendation>,
    /// Headline counters
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub summary: Summary,
    /// Scan-derived counts
    #[serde(default)]
    pub original_data: OriginalData,
}

impl AnalysisReport {
    /// Reconcile a model-produced report with the scan it describes
    ///
    /// The project name and counts always come from the scan, a missing
    /// timestamp falls back to the scan's, and every install command is
    /// regenerated.
    pub fn finalize(mut self, scan: &ScanResult) -> Self {
        self.project = scan.project.clone();
        if self.timestamp.trim().is_empty() {
            self.timestamp = scan.timestamp.to_rfc3339();
        }
        self.original_data = scan.original_data();
        for rec in &mut self.recommendations {
            rec.regenerate_update_command();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_rejects_out_of_range() {
        let result: Result<Priority, _> = serde_json::from_value(json!(4));
        assert!(result.is_err());
        let result: Result<Priority, _> = serde_json::from_value(json!(0));
        assert!(result.is_err());
        let priority: Priority = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(priority, Priority::Major);
        assert_eq!(serde_json::to_value(priority).unwrap(), json!(2));
    }

    #[test]
    fn test_recommendation_defaults() {
        let rec: Recommendation = serde_json::from_value(json!({
            "package": "axios",
            "current": "0.21.1",
            "available": "1.6.0",
            "priority": 1
        }))
        .unwrap();

        assert_eq!(rec.kind, DependencyKind::Dependency);
        assert_eq!(rec.risk, Risk::Medium);
        assert_eq!(rec.security_impact, SecurityImpact::None);
        assert!(rec.testing_required.is_empty());
        assert!(rec.update_command.is_empty());
    }

    #[test]
    fn test_finalize_overrides_model_fields() {
        let mut scan = ScanResult::new("shop");
        scan.dependencies.insert("axios".into(), "^0.21.1".into());

        let report: AnalysisReport = serde_json::from_value(json!({
            "project": "../../etc",
            "recommendations": [{
                "package": "eslint",
                "type": "devDependency",
                "current": "7.0.0",
                "available": "8.57.0",
                "priority": 2,
                "update_command": "rm -rf /"
            }]
        }))
        .unwrap();

        let report = report.finalize(&scan);
        assert_eq!(report.project, "shop");
        assert_eq!(report.timestamp, scan.timestamp.to_rfc3339());
        assert_eq!(report.original_data.dependencies_count, 1);
        assert_eq!(
            report.recommendations[0].update_command,
            "npm install eslint@8.57.0 --save-dev"
        );
    }

    #[test]
    fn test_labels_are_case_insensitive_with_fallback() {
        let rec: Recommendation = serde_json::from_value(json!({
            "package": "lodash",
            "type": "DevDependencies",
            "current": null,
            "available": "4.17.21",
            "priority": "3",
            "risk": "HIGH",
            "security_impact": "moderate",
            "changelog_summary": null,
            "testing_required": "unit",
            "vulnerabilities": null
        }))
        .unwrap();

        assert_eq!(rec.kind, DependencyKind::DevDependency);
        assert_eq!(rec.current, "");
        assert_eq!(rec.priority, Priority::Minor);
        assert_eq!(rec.risk, Risk::High);
        assert_eq!(rec.security_impact, SecurityImpact::Low);
        assert_eq!(rec.changelog_summary, "");
        assert!(rec.testing_required.contains("unit"));
        assert!(rec.vulnerabilities.is_empty());

        let risk: Risk = serde_json::from_value(json!("somewhat")).unwrap();
        assert_eq!(risk, Risk::Medium);
        let kind: DependencyKind = serde_json::from_value(json!("peerDependency")).unwrap();
        assert_eq!(kind, DependencyKind::Dependency);
        let impact: SecurityImpact = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(impact, SecurityImpact::None);
    }

    #[test]
    fn test_priority_accepts_numeric_forms_only_in_range() {
        let priority: Priority = serde_json::from_value(json!(" 1 ")).unwrap();
        assert_eq!(priority, Priority::Critical);
        let priority: Priority = serde_json::from_value(json!(2.0)).unwrap();
        assert_eq!(priority, Priority::Major);

        for bad in [json!("9"), json!(-1), json!(300), json!("high"), json!(null), json!(2.5)] {
            let result: Result<Priority, _> = serde_json::from_value(bad.clone());
            assert!(result.is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_summary_counters_are_lenient() {
        let report: AnalysisReport = serde_json::from_value(json!({
            "recommendations": null,
            "summary": {
                "total_dependencies": "12",
                "outdated": null,
                "critical": 1.0,
                "major": "n/a",
                "minor": 4
            }
        }))
        .unwrap();

        assert!(report.recommendations.is_empty());
        assert_eq!(
            report.summary,
            Summary {
                total_dependencies: 12,
                outdated: 0,
                critical: 1,
                major: 0,
                minor: 4,
                vulnerabilities: 0,
            }
        );

        let report: AnalysisReport = serde_json::from_value(json!({ "summary": null })).unwrap();
        assert_eq!(report.summary, Summary::default());
    }

    #[test]
    fn test_original_data_wire_names() {
        let value = serde_json::to_value(OriginalData {
            dependencies_count: 3,
            dev_dependencies_count: 2,
            outdated_count: 1,
            vulnerabilities_count: 0,
        })
        .unwrap();
        assert_eq!(value["devDependencies_count"], json!(2));
        assert_eq!(value["dependencies_count"], json!(3));
    }
}
