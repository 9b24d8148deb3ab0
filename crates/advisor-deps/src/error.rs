//! Error types for advisor-deps

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using advisor-deps Error
pub type Result<T> = std::result::Result<T, CollectError>;

/// Reasons a collection run can fail
#[derive(Debug, Error)]
pub enum CollectError {
    /// Project directory does not exist
    #[error("Project directory not found: {0}")]
    ProjectNotFound(PathBuf),

    /// Project directory has no package.json
    #[error("package.json not found in {0}")]
    ManifestNotFound(PathBuf),

    /// package.json could not be read
    #[error("Failed to read {path}: {source}")]
    ManifestRead {
        /// Manifest path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// package.json is not valid JSON
    #[error("Invalid package.json at {path}: {source}")]
    Manifest {
        /// Manifest path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Package manager could not be started
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Package manager exited unsuccessfully where success was required
    #[error("`{command}` exited with {status}")]
    CommandFailed {
        /// Command line
        command: String,
        /// Exit status description
        status: String,
    },

    /// Package manager printed its JSON error document instead of a result
    #[error("`{command}` failed: {summary} ({code})")]
    Reported {
        /// Command line
        command: String,
        /// npm error code, e.g. `ENOLOCK`
        code: String,
        /// npm's one-line description
        summary: String,
    },

    /// Package manager exceeded the wall-clock ceiling and was killed
    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    Timeout {
        /// Command line
        command: String,
        /// Ceiling that was exceeded
        timeout: Duration,
    },

    /// Package manager output was not JSON
    #[error("Failed to parse output of `{command}`: {source}")]
    Parse {
        /// Command line
        command: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
        /// Raw stdout, kept for diagnostics
        raw: String,
    },
}
