//! # advisor-deps
//!
//! Collects what npm knows about a project: declared dependencies from
//! `package.json`, `npm outdated --json`, and `npm audit --json`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use advisor_deps::Collector;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), advisor_deps::CollectError> {
//! let collector = Collector::new();
//! println!("npm {}", collector.manager_version().await?);
//!
//! let scan = collector.collect(Path::new(".")).await?;
//! println!("{} outdated packages", scan.outdated.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod collector;
pub mod error;
pub mod manifest;
pub mod output;

pub use collector::{Collector, DEFAULT_TIMEOUT};
pub use error::{CollectError, Result};
pub use manifest::PackageJson;
