//! Error types for advisor-ai

use thiserror::Error;

/// Result type alias for advisor-ai operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Reasons an analysis can fail
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Model service answered with a non-success status
    #[error("Model API error ({status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Completion carried no choices or no content
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Completion content did not match the report schema
    #[error("Model returned an unusable analysis: {source}")]
    InvalidResponse {
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
        /// Raw completion content
        content: String,
    },

    /// Scan data could not be serialized into the prompt
    #[error("Failed to encode scan data: {0}")]
    Encode(#[source] serde_json::Error),
}
