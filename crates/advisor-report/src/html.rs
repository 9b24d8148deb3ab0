use advisor_core::{AnalysisReport, Recommendation};

/// Render a report as a standalone HTML document
pub fn render(report: &AnalysisReport) -> String {
    let summary = &report.summary;
    let counts = &report.original_data;

    let rows = report
        .recommendations
        .iter()
        .map(render_row)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>NPM Package Update Report - {project}</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; }}
        .critical {{ background-color: #ffdddd; }}
        .major {{ background-color: #fff3d6; }}
        .minor {{ background-color: #e7f5e8; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }}
        th {{ background-color: #f2f2f2; }}
        .priority-1 {{ color: #d32f2f; font-weight: bold; }}
        .priority-2 {{ color: #ff9800; }}
        .priority-3 {{ color: #4caf50; }}
        .footer {{ color: #718096; font-size: 0.85rem; }}
    </style>
</head>
<body>
    <h1>NPM Package Update Report</h1>
    <h2 id="project">{project}</h2>
    <p>Generated on: {timestamp}</p>

    <div class="summary">
        <h3>Summary</h3>
        <ul>
            <li>Total Dependencies: {total}</li>
            <li>Outdated Packages: {outdated}</li>
            <li>Critical Updates: <span class="priority-1">{critical}</span></li>
            <li>Major Updates: <span class="priority-2">{major}</span></li>
            <li>Minor Updates: <span class="priority-3">{minor}</span></li>
            <li>Vulnerabilities: {vulnerabilities}</li>
        </ul>
    </div>

    <div class="recommendations">
        <h3>Update Recommendations</h3>
        <table>
            <tr>
                <th>Package</th>
                <th>Type</th>
                <th>Current</th>
                <th>Available</th>
                <th>Priority</th>
                <th>Risk</th>
                <th>Action</th>
            </tr>
{rows}
        </table>
    </div>

    <div class="footer">
        <p>Scanned {deps} dependencies, {dev_deps} dev dependencies, {outdated_count} outdated, {audit} audit findings.</p>
        <p>This report was generated automatically by npm-advisor</p>
    </div>
</body>
</html>
"#,
        project = html_escape(&report.project),
        timestamp = html_escape(&report.timestamp),
        total = summary.total_dependencies,
        outdated = summary.outdated,
        critical = summary.critical,
        major = summary.major,
        minor = summary.minor,
        vulnerabilities = summary.vulnerabilities,
        rows = rows,
        deps = counts.dependencies_count,
        dev_deps = counts.dev_dependencies_count,
        outdated_count = counts.outdated_count,
        audit = counts.vulnerabilities_count,
    )
}

fn render_row(rec: &Recommendation) -> String {
    format!(
        r#"            <tr class="{class}" data-package="{package}">
                <td>{package}</td>
                <td>{kind}</td>
                <td>{current}</td>
                <td>{available}</td>
                <td class="priority-{priority}">{priority}</td>
                <td>{risk}</td>
                <td>
                    <code>{command}</code><br>
                    <small>{changelog}</small>
                </td>
            </tr>"#,
        class = rec.priority.css_class(),
        package = html_escape(&rec.package),
        kind = rec.kind,
        current = html_escape(or_dash(&rec.current)),
        available = html_escape(or_dash(&rec.available)),
        priority = rec.priority,
        risk = rec.risk,
        command = html_escape(&rec.update_command),
        changelog = html_escape(&rec.changelog_summary),
    )
}

/// Placeholder for values the model left blank
pub(crate) fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
