//! # advisor-core
//!
//! Data model shared by every stage of the npm-advisor pipeline.
//!
//! - [`ScanResult`]: what the collector learned about a project
//! - [`Recommendation`] / [`AnalysisReport`]: what the model made of it
//! - [`update_command`]: the one place install commands are built
//!
//! ## Example
//!
//! ```
//! use advisor_core::{update_command, DependencyKind};
//!
//! assert_eq!(
//!     update_command("jest", "29.7.0", DependencyKind::DevDependency),
//!     "npm install jest@29.7.0 --save-dev"
//! );
//! ```

#![warn(missing_docs)]

pub mod command;
mod lenient;
pub mod report;
pub mod scan;

pub use command::update_command;
pub use report::{
    AnalysisReport, DependencyKind, OriginalData, Priority, Recommendation, Risk, SecurityImpact,
    Summary,
};
pub use scan::{OutdatedPackage, ScanResult};
