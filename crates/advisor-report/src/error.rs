//! Error types for advisor-report

use std::path::PathBuf;
use thiserror::Error;

/// Failure to persist a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Output directory or report file could not be written
    #[error("Failed to write report {path}: {source}")]
    Io {
        /// Path being created, written or renamed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Failure to deliver a report by email
#[derive(Debug, Error)]
pub enum EmailError {
    /// Sender or recipient is not a valid mailbox
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Connection, TLS, authentication or delivery failure
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Failure reported by a non-SMTP transport
    #[error("Mail transport error: {0}")]
    Transport(String),
}
