//! Error types for the runner module.
//!
//! Derive-macro expansion from thiserror/miette trips `unused_assignments` on
//! some compiler versions, so the lint is relaxed for this file only.

// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised during command execution.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The fixture file does not exist at the expected path.
    #[error("fixture not found at {}", path.display())]
    #[diagnostic(
        code(storytree::runner::fixture_not_found),
        help("pass the fixture with --file, or run from the directory containing stories.yml")
    )]
    FixtureNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },
    /// No scenario in the story has the requested title.
    #[error("no scenario titled {title:?} in story {story:?}")]
    #[diagnostic(code(storytree::runner::scenario_not_found))]
    ScenarioNotFound {
        /// Requested title.
        title: String,
        /// Story that was searched.
        story: String,
    },
}
