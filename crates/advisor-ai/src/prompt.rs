//! Analysis prompt

use crate::error::{AnalysisError, Result};
use advisor_core::ScanResult;
use serde::Serialize;

const RESPONSE_SCHEMA: &str = r#"{
    "project": "project_name",
    "timestamp": "iso_timestamp",
    "recommendations": [
        {
            "package": "package_name",
            "type": "dependency|devDependency",
            "current": "1.0.0",
            "available": "2.1.3",
            "priority": 1|2|3,
            "risk": "low|medium|high",
            "changelog_summary": "brief summary",
            "testing_required": ["unit", "integration", "e2e"],
            "security_impact": "none|low|high",
            "vulnerabilities": ["CVE-XXXX-XXXX"],
            "update_command": "npm install package@version"
        }
    ],
    "summary": {
        "total_dependencies": 0,
        "outdated": 0,
        "critical": 0,
        "major": 0,
        "minor": 0,
        "vulnerabilities": 0
    }
}"#;

/// Build the analysis request for a scan
///
/// The scan's collections are embedded verbatim as pretty-printed JSON,
/// followed by the priority legend and the response schema.
pub fn build_prompt(scan: &ScanResult) -> Result<String> {
    Ok(format!(
        r#"You are an expert NPM package dependency analyzer. Analyze this project's dependencies:

Project: {project}
Collected at: {timestamp}

Current Dependencies: {dependencies}
Dev Dependencies: {dev_dependencies}
Outdated Packages: {outdated}
Vulnerabilities: {vulnerabilities}

Provide recommendations with:
1. Critical security updates (priority 1 - red)
2. Major version updates (priority 2 - orange)
3. Minor/patch updates (priority 3 - green)

For each recommendation, include:
- Current and available versions
- Risk assessment (low/medium/high)
- Brief changelog summary
- Testing recommendations
- Security implications

Format response as JSON with this structure:
{schema}
"#,
        project = scan.project,
        timestamp = scan.timestamp.to_rfc3339(),
        dependencies = pretty(&scan.dependencies)?,
        dev_dependencies = pretty(&scan.dev_dependencies)?,
        outdated = pretty(&scan.outdated)?,
        vulnerabilities = pretty(&scan.vulnerabilities)?,
        schema = RESPONSE_SCHEMA,
    ))
}

fn pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(AnalysisError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::OutdatedPackage;
    use serde_json::json;

    #[test]
    fn test_prompt_embeds_scan_data() {
        let mut scan = ScanResult::new("shop");
        scan.dependencies
            .insert("lodash".to_string(), "^4.17.20".to_string());
        scan.dev_dependencies
            .insert("jest".to_string(), "^29.0.0".to_string());
        scan.outdated.insert(
            "lodash".to_string(),
            OutdatedPackage {
                current: Some("4.17.20".to_string()),
                latest: Some("4.17.21".to_string()),
                ..Default::default()
            },
        );
        scan.vulnerabilities = json!({ "metadata": { "vulnerabilities": { "total": 0 } } });

        let prompt = build_prompt(&scan).unwrap();
        assert!(prompt.contains("Project: shop"));
        assert!(prompt.contains(&scan.timestamp.to_rfc3339()));
        assert!(prompt.contains("\"lodash\": \"^4.17.20\""));
        assert!(prompt.contains("\"jest\": \"^29.0.0\""));
        assert!(prompt.contains("\"latest\": \"4.17.21\""));
        assert!(prompt.contains("\"total\": 0"));
        assert!(prompt.contains("\"priority\": 1|2|3"));
    }

    #[test]
    fn test_prompt_for_empty_scan() {
        let prompt = build_prompt(&ScanResult::new("empty")).unwrap();
        assert!(prompt.contains("Current Dependencies: {}"));
        assert!(prompt.contains("Outdated Packages: {}"));
    }
}
