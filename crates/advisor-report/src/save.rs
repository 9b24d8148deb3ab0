//! Report persistence

use crate::error::ReportError;
use crate::html::render;
use advisor_core::AnalysisReport;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// File name for a report generated at `now`
///
/// Resolution is one second: two reports for the same project saved within
/// the same second share a name and the later one wins.
pub fn report_filename(project: &str, now: DateTime<Local>) -> String {
    let project: String = project
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!(
        "npm_update_{}_{}.html",
        project,
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Render `report` and write it under `output_dir`, creating the directory
/// if needed. Returns the path of the written file.
pub async fn save_report(report: &AnalysisReport, output_dir: &Path) -> Result<PathBuf, ReportError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ReportError::Io { path, source }
    };

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(io_err(output_dir))?;

    let path = output_dir.join(report_filename(&report.project, Local::now()));
    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("html.tmp");

    tokio::fs::write(&temp_path, render(report))
        .await
        .map_err(io_err(&temp_path))?;
    tokio::fs::rename(&temp_path, &path)
        .await
        .map_err(io_err(&path))?;

    tracing::info!(path = %path.display(), "Report saved");
    Ok(path)
}
