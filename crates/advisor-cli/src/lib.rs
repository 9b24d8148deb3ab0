//! npm-advisor pipeline.
//!
//! The binary in `main.rs` only loads settings and sets up logging; the
//! stages are wired together here so they can be driven with stub models
//! and transports.

pub mod pipeline;

pub use pipeline::{exit_code, process, run, EmailStatus, Mail, PipelineReport};
