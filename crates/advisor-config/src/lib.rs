//! Environment-driven settings for npm-advisor.
//!
//! Settings are read once, validated explicitly by the caller, and never
//! mutated afterwards.

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{AiConfig, AiProvider, EmailConfig, ReportConfig, Settings};
