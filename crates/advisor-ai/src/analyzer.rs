//! Update analyzer

use crate::client::{ChatModel, CompletionRequest};
use crate::error::{AnalysisError, Result};
use crate::prompt::build_prompt;
use advisor_core::{AnalysisReport, ScanResult};

/// Low temperature keeps rankings stable between runs
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Ranks available updates with a chat model
///
/// One model call per [`analyze`](UpdateAnalyzer::analyze); failures are
/// returned, never retried.
pub struct UpdateAnalyzer<M> {
    model: M,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl<M: ChatModel> UpdateAnalyzer<M> {
    /// Create an analyzer backed by `model`
    pub fn new(model: M) -> Self {
        Self {
            model,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }

    /// Cap the completion length
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Analyze a scan and return the reconciled report
    pub async fn analyze(&self, scan: &ScanResult) -> Result<AnalysisReport> {
        self.try_analyze(scan)
            .await
            .inspect_err(|e| tracing::error!("Analysis failed: {}", e))
    }

    async fn try_analyze(&self, scan: &ScanResult) -> Result<AnalysisReport> {
        let request = CompletionRequest {
            system_prompt: build_prompt(scan)?,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            json_response: true,
        };

        tracing::info!(
            model = self.model.model_name(),
            project = %scan.project,
            "Requesting update analysis"
        );
        let content = self.model.complete(&request).await?;
        let report = parse_report(&content)?.finalize(scan);

        tracing::info!(
            recommendations = report.recommendations.len(),
            "Analysis complete"
        );
        Ok(report)
    }
}

/// Parse completion text into a report
///
/// Tolerates a Markdown code fence around the JSON, which some models add
/// even in JSON mode.
pub fn parse_report(content: &str) -> Result<AnalysisReport> {
    serde_json::from_str(strip_code_fence(content)).map_err(|source| {
        AnalysisError::InvalidResponse {
            source,
            content: content.to_string(),
        }
    })
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
