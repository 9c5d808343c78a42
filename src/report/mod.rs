//! Report tree structures.
//!
//! Report consumers understand two node kinds only: a [`SuiteNode`] groups
//! children under a label and a [`TestNode`] is a labelled leaf that may point
//! back at the code implementing it. Trees are assembled bottom-up by
//! [`ReportTreeBuilder`]; a node is never modified after it is attached to its
//! parent.
//!
//! # Examples
//!
//! ```
//! use storytree::report::{ReportNode, SuiteNode, TestNode};
//!
//! let mut scenario = SuiteNode::new("Scenario: Valid credentials");
//! scenario.push(TestNode::new("Given a user").with_owner("LoginSteps"));
//! let mut story = SuiteNode::new("Login");
//! story.push(scenario);
//!
//! let tree = ReportNode::from(story);
//! assert_eq!(tree.children().len(), 1);
//! assert_eq!(tree.test_count(), 1);
//! ```

use serde::Serialize;

use crate::steps::OwnerId;

pub mod builder;
mod render;

pub use builder::{
    AFTER_SCENARIO_STEP_NAME, AFTER_STORY_STEP_NAME, BEFORE_SCENARIO_STEP_NAME,
    BEFORE_STORY_STEP_NAME, BuildWarning, MAX_COMPOSITE_DEPTH, PENDING_PREFIX, ReportTreeBuilder,
};

/// A node of the report tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportNode {
    /// A labelled group of children.
    Suite(SuiteNode),
    /// A labelled leaf.
    Test(TestNode),
}

impl ReportNode {
    /// Label of the node.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Suite(suite) => &suite.label,
            Self::Test(test) => &test.label,
        }
    }

    /// Children of a suite; tests have none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Suite(suite) => &suite.children,
            Self::Test(_) => &[],
        }
    }

    /// The suite, if this node is one.
    #[must_use]
    pub const fn as_suite(&self) -> Option<&SuiteNode> {
        match self {
            Self::Suite(suite) => Some(suite),
            Self::Test(_) => None,
        }
    }

    /// The test, if this node is one.
    #[must_use]
    pub const fn as_test(&self) -> Option<&TestNode> {
        match self {
            Self::Test(test) => Some(test),
            Self::Suite(_) => None,
        }
    }

    /// Number of test nodes in this subtree.
    #[must_use]
    pub fn test_count(&self) -> usize {
        match self {
            Self::Test(_) => 1,
            Self::Suite(suite) => suite.children.iter().map(Self::test_count).sum(),
        }
    }
}

impl From<SuiteNode> for ReportNode {
    fn from(value: SuiteNode) -> Self {
        Self::Suite(value)
    }
}

impl From<TestNode> for ReportNode {
    fn from(value: TestNode) -> Self {
        Self::Test(value)
    }
}

/// A grouping node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteNode {
    /// Display label, unique within the build session.
    pub label: String,
    /// Children in emission order.
    pub children: Vec<ReportNode>,
}

impl SuiteNode {
    /// Create a childless suite.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Attach a finished child.
    pub fn push(&mut self, child: impl Into<ReportNode>) {
        self.children.push(child.into());
    }

    /// First direct child labelled `label`.
    #[must_use]
    pub fn child(&self, label: &str) -> Option<&ReportNode> {
        self.children.iter().find(|c| c.label() == label)
    }

    /// Labels of the direct children, in order.
    #[must_use]
    pub fn child_labels(&self) -> Vec<&str> {
        self.children.iter().map(ReportNode::label).collect()
    }
}

/// A leaf node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestNode {
    /// Display label, unique within the build session.
    pub label: String,
    /// Code implementing the step or hook, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerId>,
    /// Metadata copied from the implementing hook.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

impl TestNode {
    /// Create a leaf with no owner.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            owner: None,
            annotations: Vec::new(),
        }
    }

    /// Associate the implementing code.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<OwnerId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Attach metadata.
    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<String>) -> Self {
        self.annotations = annotations;
        self
    }
}
