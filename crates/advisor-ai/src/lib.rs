//! LLM-backed ranking of npm dependency updates
//!
//! The analyzer turns a [`ScanResult`](advisor_core::ScanResult) into a prompt,
//! asks a chat-completion model for a JSON verdict, and reconciles the answer
//! with the scan.
//!
//! # Example
//!
//! ```no_run
//! use advisor_ai::{OpenAiCompatibleClient, UpdateAnalyzer};
//! use advisor_config::Settings;
//! use advisor_core::ScanResult;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let client = OpenAiCompatibleClient::from_config(&settings.ai)?;
//!     let analyzer = UpdateAnalyzer::new(client).with_max_tokens(settings.ai.max_tokens);
//!
//!     let report = analyzer.analyze(&ScanResult::new("my-app")).await?;
//!     println!("{} recommendations", report.recommendations.len());
//!     Ok(())
//! }
//! ```

mod analyzer;
mod client;
mod error;
mod prompt;

pub use analyzer::{parse_report, UpdateAnalyzer, DEFAULT_TEMPERATURE};
pub use client::{ChatModel, CompletionRequest, OpenAiCompatibleClient};
pub use error::{AnalysisError, Result};
pub use prompt::build_prompt;
