//! Analyzer behaviour against a stubbed model

use advisor_ai::{AnalysisError, ChatModel, CompletionRequest, UpdateAnalyzer};
use advisor_core::{DependencyKind, OutdatedPackage, Priority, Risk, ScanResult, SecurityImpact};
use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{json, Value};

struct StubModel(Value);

#[async_trait]
impl ChatModel for StubModel {
    async fn complete(&self, _request: &CompletionRequest) -> advisor_ai::Result<String> {
        Ok(self.0.to_string())
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

fn lodash_scan() -> ScanResult {
    let mut scan = ScanResult::new("shop");
    scan.dependencies
        .insert("lodash".to_string(), "^4.17.20".to_string());
    scan.dependencies
        .insert("react".to_string(), "^18.2.0".to_string());
    scan.dev_dependencies
        .insert("jest".to_string(), "^29.0.0".to_string());
    scan.outdated.insert(
        "lodash".to_string(),
        OutdatedPackage {
            current: Some("4.17.20".to_string()),
            wanted: Some("4.17.21".to_string()),
            latest: Some("4.17.21".to_string()),
            ..Default::default()
        },
    );
    scan
}

#[tokio::test]
async fn test_lodash_minor_update() {
    let model = StubModel(json!({
        "project": "something-else",
        "timestamp": "2024-03-01T10:00:00Z",
        "recommendations": [{
            "package": "lodash",
            "type": "dependency",
            "current": "4.17.20",
            "available": "4.17.21",
            "priority": 3,
            "risk": "low",
            "changelog_summary": "Security fix for prototype pollution in zipObjectDeep",
            "testing_required": ["unit", "unit"],
            "security_impact": "low",
            "vulnerabilities": [],
            "update_command": "yarn add lodash"
        }],
        "summary": {
            "total_dependencies": 3,
            "outdated": 1,
            "critical": 0,
            "major": 0,
            "minor": 1,
            "vulnerabilities": 0
        }
    }));

    let scan = lodash_scan();
    let report = UpdateAnalyzer::new(model).analyze(&scan).await.unwrap();

    assert_eq!(report.project, "shop");
    assert_eq!(report.timestamp, "2024-03-01T10:00:00Z");
    assert_eq!(report.summary.minor, 1);

    let rec = &report.recommendations[0];
    assert_eq!(rec.priority, Priority::Minor);
    assert_eq!(rec.risk, Risk::Low);
    assert_eq!(rec.testing_required.len(), 1);
    assert_eq!(rec.update_command, "npm install lodash@4.17.21");

    assert_eq!(report.original_data.dependencies_count, 2);
    assert_eq!(report.original_data.dev_dependencies_count, 1);
    assert_eq!(report.original_data.outdated_count, 1);
    assert_eq!(report.original_data.vulnerabilities_count, 0);
}

#[tokio::test]
async fn test_vulnerability_count_from_audit_metadata() {
    let mut scan = lodash_scan();
    scan.vulnerabilities = json!({
        "auditReportVersion": 2,
        "metadata": { "vulnerabilities": { "low": 1, "high": 2, "total": 3 } }
    });

    let report = UpdateAnalyzer::new(StubModel(json!({ "recommendations": [] })))
        .analyze(&scan)
        .await
        .unwrap();
    assert_eq!(report.original_data.vulnerabilities_count, 3);
    assert!(report.recommendations.is_empty());
    assert_eq!(report.summary, advisor_core::Summary::default());
}

#[tokio::test]
async fn test_out_of_range_priority_is_rejected() {
    let model = StubModel(json!({
        "recommendations": [{
            "package": "lodash",
            "current": "4.17.20",
            "available": "4.17.21",
            "priority": 7
        }]
    }));

    let result = UpdateAnalyzer::new(model).analyze(&lodash_scan()).await;
    match result {
        Err(AnalysisError::InvalidResponse { content, .. }) => assert!(content.contains("\"priority\":7")),
        other => panic!("expected invalid response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_loose_model_output_is_tolerated() {
    let model = StubModel(json!({
        "recommendations": [
            {
                "package": "lodash",
                "type": "dependencies",
                "current": null,
                "available": "4.17.21",
                "priority": "3",
                "risk": "Medium",
                "changelog_summary": null,
                "security_impact": "moderate",
                "update_command": null
            },
            {
                "package": "jest",
                "type": "DevDependency",
                "current": "29.0.0",
                "available": "29.7.0",
                "priority": 2,
                "risk": "unknown"
            }
        ],
        "summary": { "total_dependencies": "3", "outdated": null, "minor": 1 }
    }));

    let report = UpdateAnalyzer::new(model)
        .analyze(&lodash_scan())
        .await
        .unwrap();

    let lodash = &report.recommendations[0];
    assert_eq!(lodash.kind, DependencyKind::Dependency);
    assert_eq!(lodash.current, "");
    assert_eq!(lodash.priority, Priority::Minor);
    assert_eq!(lodash.risk, Risk::Medium);
    assert_eq!(lodash.security_impact, SecurityImpact::Low);
    assert_eq!(lodash.changelog_summary, "");
    assert_eq!(lodash.update_command, "npm install lodash@4.17.21");

    let jest = &report.recommendations[1];
    assert_eq!(jest.kind, DependencyKind::DevDependency);
    assert_eq!(jest.risk, Risk::Medium);
    assert_eq!(jest.update_command, "npm install jest@29.7.0 --save-dev");

    assert_eq!(report.summary.total_dependencies, 3);
    assert_eq!(report.summary.outdated, 0);
    assert_eq!(report.summary.minor, 1);
}

#[tokio::test]
async fn test_numeric_string_priority_out_of_range_is_rejected() {
    let model = StubModel(json!({
        "recommendations": [{
            "package": "lodash",
            "current": "4.17.20",
            "available": "4.17.21",
            "priority": "4"
        }]
    }));

    let result = UpdateAnalyzer::new(model).analyze(&lodash_scan()).await;
    assert!(matches!(result, Err(AnalysisError::InvalidResponse { .. })));
}

fn recommendation() -> impl Strategy<Value = (String, String, bool, String)> {
    (
        "(@[a-z]{1,8}/)?[a-z][a-z0-9-]{0,15}",
        "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
        any::<bool>(),
        ".{0,40}",
    )
}

proptest! {
    #[test]
    fn prop_update_commands_are_regenerated(recs in prop::collection::vec(recommendation(), 0..8)) {
        let model_recs: Vec<Value> = recs
            .iter()
            .map(|(package, available, dev, bogus)| {
                json!({
                    "package": package,
                    "type": if *dev { "devDependency" } else { "dependency" },
                    "current": "0.0.1",
                    "available": available,
                    "priority": 2,
                    "update_command": bogus,
                })
            })
            .collect();
        let model = StubModel(json!({ "recommendations": model_recs }));

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let report = runtime
            .block_on(UpdateAnalyzer::new(model).analyze(&ScanResult::new("prop")))
            .unwrap();

        prop_assert_eq!(report.recommendations.len(), recs.len());
        for (rec, (package, available, dev, _)) in report.recommendations.iter().zip(&recs) {
            let mut expected = format!("npm install {}@{}", package, available);
            if *dev {
                expected.push_str(" --save-dev");
            }
            prop_assert_eq!(&rec.update_command, &expected);
            prop_assert_eq!(rec.kind == DependencyKind::DevDependency, *dev);
        }
    }
}
