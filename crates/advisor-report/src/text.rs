use crate::html::or_dash;
use advisor_core::AnalysisReport;

/// Plain-text alternative of a report, for mail clients without HTML
pub fn plain_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("NPM Package Update Report - {}\n", report.project));
    out.push_str(&format!("Generated on: {}\n\n", report.timestamp));
    out.push_str(&format!("Outdated packages: {}\n", report.summary.outdated));
    out.push_str(&format!("Critical updates: {}\n\n", report.summary.critical));
    out.push_str("Recommendations:\n");
    for rec in &report.recommendations {
        out.push_str(&format!(
            "- {}: {} → {} (Priority {})\n",
            rec.package,
            or_dash(&rec.current),
            or_dash(&rec.available),
            rec.priority
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_lists_recommendations() {
        let report: AnalysisReport = serde_json::from_value(json!({
            "project": "shop",
            "timestamp": "2024-03-01T10:00:00Z",
            "recommendations": [
                { "package": "react", "current": "17.0.2", "available": "18.2.0", "priority": 2 },
                { "package": "lodash", "current": "4.17.20", "available": "4.17.21", "priority": 3 },
                { "package": "left-pad", "current": null, "available": "1.3.0", "priority": "3" }
            ],
            "summary": { "outdated": 3, "critical": 0 }
        }))
        .unwrap();

        let text = plain_text(&report);
        assert!(text.starts_with("NPM Package Update Report - shop\n"));
        assert!(text.contains("Outdated packages: 3\n"));
        assert!(text.contains("Critical updates: 0\n"));
        assert!(text.contains("- react: 17.0.2 → 18.2.0 (Priority 2)\n"));
        assert!(text.contains("- lodash: 4.17.20 → 4.17.21 (Priority 3)\n"));
        assert!(text.contains("- left-pad: - → 1.3.0 (Priority 3)\n"));
    }
}
