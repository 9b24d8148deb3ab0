//! Dependency collector

use crate::error::{CollectError, Result};
use crate::manifest::{PackageJson, MANIFEST_FILE};
use crate::output::{check_npm_error, parse_json_output, parse_outdated};
use advisor_core::ScanResult;
use chrono::Utc;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Wall-clock ceiling for a single package-manager invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the package manager against a project and gathers a [`ScanResult`]
///
/// Every invocation is attempted once. A process that outlives the timeout is
/// killed and reported as [`CollectError::Timeout`].
#[derive(Debug, Clone)]
pub struct Collector {
    program: String,
    timeout: Duration,
}

impl Collector {
    /// Collector using `npm` from `PATH`
    pub fn new() -> Self {
        Self::with_program("npm")
    }

    /// Collector using a specific package-manager executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-invocation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executable this collector runs
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Report the package manager's version, failing if it cannot be run
    pub async fn manager_version(&self) -> Result<String> {
        let (command, output) = self.run(&["-v"], None).await?;
        if !output.status.success() {
            return Err(CollectError::CommandFailed {
                command,
                status: output.status.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Collect manifest, outdated and audit data for the project at `project_path`
    pub async fn collect(&self, project_path: &Path) -> Result<ScanResult> {
        let is_dir = tokio::fs::metadata(project_path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(CollectError::ProjectNotFound(project_path.to_path_buf()));
        }

        let manifest_path = project_path.join(MANIFEST_FILE);
        if !tokio::fs::try_exists(&manifest_path).await.unwrap_or(false) {
            return Err(CollectError::ManifestNotFound(project_path.to_path_buf()));
        }

        let manifest = PackageJson::read(&manifest_path).await?;
        tracing::debug!(
            dependencies = manifest.dependencies.len(),
            dev_dependencies = manifest.dev_dependencies.len(),
            "Read {}",
            manifest_path.display()
        );

        let outdated = self.run_json(&["outdated", "--json"], project_path).await?;
        let outdated = parse_outdated(&self.command_line(&["outdated", "--json"]), outdated)?;

        let vulnerabilities = self.run_json(&["audit", "--json"], project_path).await?;
        check_npm_error(&self.command_line(&["audit", "--json"]), &vulnerabilities)?;

        let project = project_name(project_path).await;
        tracing::info!(
            project = %project,
            outdated = outdated.len(),
            "Collected dependency data"
        );

        Ok(ScanResult {
            project,
            timestamp: Utc::now(),
            dependencies: manifest.dependencies,
            dev_dependencies: manifest.dev_dependencies,
            peer_dependencies: manifest.peer_dependencies,
            outdated,
            vulnerabilities,
        })
    }

    /// Run a `--json` subcommand and parse its stdout
    ///
    /// The exit status is ignored: `npm outdated` and `npm audit` exit
    /// non-zero precisely when they have something to report.
    async fn run_json(&self, args: &[&str], cwd: &Path) -> Result<serde_json::Value> {
        let (command, output) = self.run(args, Some(cwd)).await?;
        if !output.status.success() {
            tracing::debug!(status = %output.status, "`{}` exited non-zero", command);
        }
        parse_json_output(&command, &String::from_utf8_lossy(&output.stdout))
    }

    async fn run(&self, args: &[&str], cwd: Option<&Path>) -> Result<(String, Output)> {
        let command = self.command_line(args);

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        tracing::debug!("Running `{}`", command);
        let child = cmd.spawn().map_err(|source| CollectError::Spawn {
            command: command.clone(),
            source,
        })?;

        // Dropping the future on timeout drops the child, which kills it
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok((command, output)),
            Ok(Err(source)) => Err(CollectError::Spawn { command, source }),
            Err(_) => {
                tracing::warn!("`{}` exceeded {:?}, killed", command, self.timeout);
                Err(CollectError::Timeout {
                    command,
                    timeout: self.timeout,
                })
            }
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

async fn project_name(project_path: &Path) -> String {
    let resolved = tokio::fs::canonicalize(project_path)
        .await
        .unwrap_or_else(|_| project_path.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_project_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let result = Collector::new().collect(&missing).await;
        assert!(matches!(result, Err(CollectError::ProjectNotFound(p)) if p == missing));
    }

    #[tokio::test]
    async fn test_file_is_not_a_project_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("package.json");
        std::fs::write(&file, "{}").unwrap();

        let result = Collector::new().collect(&file).await;
        assert!(matches!(result, Err(CollectError::ProjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_manifest() {
        let temp_dir = TempDir::new().unwrap();

        let result = Collector::new().collect(temp_dir.path()).await;
        assert!(matches!(result, Err(CollectError::ManifestNotFound(_))));
    }

    #[tokio::test]
    async fn test_unreachable_package_manager() {
        let collector = Collector::with_program("definitely-not-a-package-manager-4f2a");
        let result = collector.manager_version().await;
        assert!(matches!(result, Err(CollectError::Spawn { .. })));
    }

    #[test]
    fn test_command_line() {
        let collector = Collector::with_program("/usr/local/bin/npm");
        assert_eq!(
            collector.command_line(&["outdated", "--json"]),
            "/usr/local/bin/npm outdated --json"
        );
        assert_eq!(collector.timeout, DEFAULT_TIMEOUT);
    }
}
