//! Shared helpers for integration tests.
//!
//! Integration tests under `tests/` compile as independent crates. This module
//! is included via `mod common;` in individual test files to share fixtures and
//! helpers while keeping test modules small and avoiding duplication.

use storytree::keywords::{Keywords, StepType};
use storytree::report::{ReportNode, ReportTreeBuilder, SuiteNode, TestNode};
use storytree::steps::{StepCandidate, StepProvider};

/// Build a candidate, panicking on an invalid pattern.
pub fn candidate(step_type: StepType, pattern: &str, owner: &str) -> StepCandidate {
    StepCandidate::new(step_type, pattern, owner)
        .unwrap_or_else(|e| panic!("invalid test pattern {pattern:?}: {e}"))
}

/// Provider implementing the login steps used across tests.
pub fn login_provider() -> StepProvider {
    StepProvider::new()
        .with_candidate(candidate(StepType::Given, "a user", "LoginSteps"))
        .with_candidate(candidate(StepType::When, "they log in", "LoginSteps"))
}

/// Builder over `providers` with the default keywords.
pub fn builder(providers: &[StepProvider]) -> ReportTreeBuilder {
    ReportTreeBuilder::new(providers, Keywords::default())
}

/// Direct child of `suite` labelled `label`, required to be a suite.
pub fn child_suite<'a>(suite: &'a SuiteNode, label: &str) -> &'a SuiteNode {
    suite
        .child(label)
        .and_then(ReportNode::as_suite)
        .unwrap_or_else(|| panic!("no suite child {label:?} in {:?}", suite.child_labels()))
}

/// Direct child of `suite` labelled `label`, required to be a test.
pub fn child_test<'a>(suite: &'a SuiteNode, label: &str) -> &'a TestNode {
    suite
        .child(label)
        .and_then(ReportNode::as_test)
        .unwrap_or_else(|| panic!("no test child {label:?} in {:?}", suite.child_labels()))
}

/// Owner of a test node as text.
pub fn owner_of(test: &TestNode) -> Option<&str> {
    test.owner.as_ref().map(|o| o.as_str())
}
