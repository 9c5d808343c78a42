//! Story-to-report-tree conversion.
//!
//! [`ReportTreeBuilder`] walks a story once, top to bottom, and emits the
//! report tree without running anything. A scenario either expands into one
//! suite per example row or lists its given stories and steps directly; the
//! choice is made before any child is emitted. Every label goes through one
//! [`LabelUniquifier`] owned by the builder, so labels stay distinct across
//! the whole session and not just among siblings.

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, warn};

use crate::hooks::HookRegistry;
use crate::keywords::{Keywords, StepType};
use crate::label::{LabelUniquifier, first_line};
use crate::model::{Scenario, Story, render_row, story_file_name};
use crate::steps::{LifecycleStep, OwnerId, ScenarioType, Stage, StepCandidate, StepProvider, find_match};

use super::{SuiteNode, TestNode};

/// Label of the leaf representing a before-story hook.
pub const BEFORE_STORY_STEP_NAME: &str = "@BeforeStory";
/// Label of the leaf representing an after-story hook.
pub const AFTER_STORY_STEP_NAME: &str = "@AfterStory";
/// Label of the leaf representing a before-scenario hook.
pub const BEFORE_SCENARIO_STEP_NAME: &str = "@BeforeScenario";
/// Label of the leaf representing an after-scenario hook.
pub const AFTER_SCENARIO_STEP_NAME: &str = "@AfterScenario";
/// Prefix of steps with no implementation.
pub const PENDING_PREFIX: &str = "[PENDING] ";
/// Deepest composite nesting that is expanded.
pub const MAX_COMPOSITE_DEPTH: usize = 32;

/// Something the builder left out of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum BuildWarning {
    /// An unmatched step whose starting word is not a known keyword.
    #[error("step {step:?} omitted from the report: no starting keyword recognised")]
    #[diagnostic(code(storytree::report::unclassified_step), severity(Warning))]
    UnclassifiedStep {
        /// The omitted step text.
        step: String,
    },
    /// A composite nested too deeply to expand.
    #[error("composite step {step:?} not expanded beyond depth {depth}")]
    #[diagnostic(code(storytree::report::composite_too_deep), severity(Warning))]
    CompositeTooDeep {
        /// The composite step text.
        step: String,
        /// Nesting depth at which expansion stopped.
        depth: usize,
    },
}

enum Resolution {
    Composite(Vec<String>),
    Implemented(OwnerId),
    Unmatched,
}

/// Builds report trees for stories and scenarios.
///
/// One builder carries its label table, leaf counter and warnings across
/// every call. Use one builder per run; it is not meant to be shared between
/// threads.
///
/// # Examples
///
/// ```
/// use storytree::keywords::{Keywords, StepType};
/// use storytree::model::{Scenario, Story};
/// use storytree::report::ReportTreeBuilder;
/// use storytree::steps::{StepCandidate, StepProvider};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = StepProvider::new()
///     .with_candidate(StepCandidate::new(StepType::Given, "a user", "LoginSteps")?);
/// let story = Story::new("Login").with_scenario(
///     Scenario::new("Valid credentials").with_steps(["Given a user", "Then it works"]),
/// );
///
/// let mut builder = ReportTreeBuilder::new(&[provider], Keywords::default());
/// let tree = builder.build_story(&story);
/// assert_eq!(tree.label, "Login");
/// assert_eq!(builder.leaf_count(), 2);
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct ReportTreeBuilder {
    keywords: Keywords,
    candidates: Vec<StepCandidate>,
    hooks: HookRegistry,
    labels: LabelUniquifier,
    test_cases: usize,
    warnings: Vec<BuildWarning>,
}

impl ReportTreeBuilder {
    /// Collect candidates and hooks from `providers`, in provider order.
    #[must_use]
    pub fn new(providers: &[StepProvider], keywords: Keywords) -> Self {
        let candidates = providers
            .iter()
            .flat_map(|p| p.candidates.iter().cloned())
            .collect::<Vec<_>>();
        let hooks = HookRegistry::from_providers(providers);
        debug!(
            providers = providers.len(),
            candidates = candidates.len(),
            "collected step candidates"
        );
        Self {
            keywords,
            candidates,
            hooks,
            labels: LabelUniquifier::new(),
            test_cases: 0,
            warnings: Vec::new(),
        }
    }

    /// Leaves emitted so far across all calls on this builder.
    #[must_use]
    pub const fn leaf_count(&self) -> usize {
        self.test_cases
    }

    /// Steps left out of the trees built so far.
    #[must_use]
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Build the tree for a whole story, story hooks included.
    pub fn build_story(&mut self, story: &Story) -> SuiteNode {
        debug!(story = %story.name, scenarios = story.scenarios.len(), "building story");
        let mut node = SuiteNode::new(self.labels.make_unique(&story.name));
        self.add_story_hook(Stage::Before, &mut node, BEFORE_STORY_STEP_NAME);
        for scenario in &story.scenarios {
            let child = self.build_scenario(scenario);
            node.push(child);
        }
        self.add_story_hook(Stage::After, &mut node, AFTER_STORY_STEP_NAME);
        node
    }

    /// Build the tree for one scenario.
    pub fn build_scenario(&mut self, scenario: &Scenario) -> SuiteNode {
        let title = self.labels.make_unique(&scenario.title);
        let mut node = SuiteNode::new(prefixed(self.keywords.scenario(), &title));
        if scenario.expands_examples() {
            debug!(
                scenario = %scenario.title,
                rows = scenario.examples.len(),
                "expanding example rows"
            );
            for row in scenario.examples.rows() {
                let rendered = prefixed(self.keywords.examples_table_row(), &render_row(row));
                let mut row_node = SuiteNode::new(self.labels.make_unique(&rendered));
                self.add_given_stories(scenario, &mut row_node);
                self.add_scenario_steps(ScenarioType::Example, scenario, &mut row_node);
                node.push(row_node);
            }
        } else {
            self.add_given_stories(scenario, &mut node);
            self.add_scenario_steps(ScenarioType::Normal, scenario, &mut node);
        }
        node
    }

    fn add_given_stories(&mut self, scenario: &Scenario, parent: &mut SuiteNode) {
        for path in &scenario.given_stories.paths {
            let label = self.labels.make_unique(story_file_name(path));
            parent.push(SuiteNode::new(label));
            self.test_cases += 1;
        }
    }

    fn add_scenario_steps(
        &mut self,
        scenario_type: ScenarioType,
        scenario: &Scenario,
        parent: &mut SuiteNode,
    ) {
        self.add_scenario_hook(scenario_type, Stage::Before, parent, BEFORE_SCENARIO_STEP_NAME);
        self.add_steps(parent, &scenario.steps, None, 0);
        self.add_scenario_hook(scenario_type, Stage::After, parent, AFTER_SCENARIO_STEP_NAME);
    }

    fn add_story_hook(&mut self, stage: Stage, parent: &mut SuiteNode, name: &str) {
        if let Some(hook) = self.hooks.story_hook(stage) {
            parent.push(hook_leaf(&mut self.labels, hook, name));
            self.test_cases += 1;
        }
    }

    fn add_scenario_hook(
        &mut self,
        scenario_type: ScenarioType,
        stage: Stage,
        parent: &mut SuiteNode,
        name: &str,
    ) {
        if let Some(hook) = self.hooks.scenario_hook(scenario_type, stage) {
            parent.push(hook_leaf(&mut self.labels, hook, name));
            self.test_cases += 1;
        }
    }

    /// Emit `steps` under `parent`, threading the preceding non-`And` type.
    ///
    /// Returns the type carried past the last step. A composite's sub-steps
    /// continue the carry, and whatever they leave behind applies to the next
    /// step of the enclosing sequence.
    fn add_steps(
        &mut self,
        parent: &mut SuiteNode,
        steps: &[String],
        mut preceding: Option<StepType>,
        depth: usize,
    ) -> Option<StepType> {
        for step in steps {
            let (resolution, next) =
                match find_match(&self.candidates, step, preceding, &self.keywords) {
                    Some(found) if found.candidate.is_composite() => (
                        Resolution::Composite(found.candidate.composed_steps().to_vec()),
                        found.preceding,
                    ),
                    Some(found) => (
                        Resolution::Implemented(found.candidate.owner().clone()),
                        found.preceding,
                    ),
                    None => (Resolution::Unmatched, preceding),
                };
            preceding = next;
            let one_line = first_line(step);
            match resolution {
                Resolution::Composite(composed) => {
                    let mut node = SuiteNode::new(self.labels.make_unique(one_line));
                    if depth < MAX_COMPOSITE_DEPTH {
                        preceding = self.add_steps(&mut node, &composed, preceding, depth + 1);
                    } else {
                        warn!(step = %one_line, depth, "composite nesting too deep; not expanded");
                        self.warnings.push(BuildWarning::CompositeTooDeep {
                            step: step.clone(),
                            depth,
                        });
                    }
                    parent.push(node);
                }
                Resolution::Implemented(owner) => {
                    let label = self.labels.make_unique(one_line);
                    parent.push(TestNode::new(label).with_owner(owner));
                    self.test_cases += 1;
                }
                Resolution::Unmatched => self.add_unmatched_step(parent, step),
            }
        }
        preceding
    }

    fn add_unmatched_step(&mut self, parent: &mut SuiteNode, step: &str) {
        let one_line = first_line(step);
        match self.keywords.step_type_for(step) {
            Ok(StepType::Ignorable) => {
                parent.push(SuiteNode::new(self.labels.make_unique(one_line)));
                self.test_cases += 1;
            }
            Ok(_) => {
                let label = self.labels.make_unique(&format!("{PENDING_PREFIX}{one_line}"));
                debug!(step = %one_line, "no matching candidate; reporting as pending");
                parent.push(TestNode::new(label));
                self.test_cases += 1;
            }
            Err(err) => {
                warn!(error = %err, "step omitted from report");
                self.warnings.push(BuildWarning::UnclassifiedStep {
                    step: step.to_owned(),
                });
            }
        }
    }
}

fn hook_leaf(labels: &mut LabelUniquifier, hook: &LifecycleStep, name: &str) -> TestNode {
    TestNode::new(labels.make_unique(name))
        .with_owner(hook.owner.clone())
        .with_annotations(hook.annotations.clone())
}

fn prefixed(keyword: &str, text: &str) -> String {
    if keyword.is_empty() {
        text.to_owned()
    } else {
        format!("{keyword} {text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportNode;
    use rstest::rstest;

    fn builder_with(candidates: Vec<StepCandidate>) -> ReportTreeBuilder {
        let provider = StepProvider {
            candidates,
            ..StepProvider::default()
        };
        ReportTreeBuilder::new(&[provider], Keywords::default())
    }

    #[rstest]
    fn composite_inherits_outer_preceding_type() {
        let composite = StepCandidate::new(StepType::Given, "a logged in user", "Login")
            .expect("candidate")
            .with_composed_steps(["And an account"]);
        let account = StepCandidate::new(StepType::Given, "an account", "Accounts")
            .expect("candidate");
        let mut builder = builder_with(vec![composite, account]);

        let node = builder.build_scenario(
            &Scenario::new("s").with_steps(["Given a logged in user"]),
        );

        let composite_node = node.child("Given a logged in user").expect("composite");
        let inner = composite_node.children().first().and_then(ReportNode::as_test);
        assert_eq!(
            inner.and_then(|t| t.owner.as_ref()).map(OwnerId::as_str),
            Some("Accounts")
        );
        assert_eq!(builder.leaf_count(), 1);
    }

    #[rstest]
    fn inner_composite_steps_carry_into_outer_sequence() {
        let composite = StepCandidate::new(StepType::When, "they check out", "Cart")
            .expect("candidate")
            .with_composed_steps(["Then the basket empties"]);
        let then = StepCandidate::new(StepType::Then, "the basket empties", "Cart")
            .expect("candidate");
        let and_when = StepCandidate::new(StepType::When, "they pay", "Pay").expect("candidate");
        let mut builder = builder_with(vec![composite, then, and_when]);

        let node = builder.build_scenario(
            &Scenario::new("s").with_steps(["When they check out", "And they pay"]),
        );

        assert_eq!(
            node.child_labels(),
            ["When they check out", "[PENDING] And they pay"]
        );
    }

    #[rstest]
    fn self_composing_step_stops_at_depth_limit() {
        let looping = StepCandidate::new(StepType::Given, "forever", "Loop")
            .expect("candidate")
            .with_composed_steps(["Given forever"]);
        let mut builder = builder_with(vec![looping]);

        let node = builder.build_scenario(&Scenario::new("s").with_steps(["Given forever"]));

        assert_eq!(builder.leaf_count(), 0);
        assert_eq!(
            builder.warnings(),
            [BuildWarning::CompositeTooDeep {
                step: "Given forever".into(),
                depth: MAX_COMPOSITE_DEPTH,
            }]
        );
        let mut depth = 0;
        let mut current = node.children.first();
        while let Some(child) = current {
            depth += 1;
            current = child.children().first();
        }
        assert_eq!(depth, MAX_COMPOSITE_DEPTH + 1);
    }

    #[rstest]
    #[case("", "t", "t")]
    #[case("Scenario:", "t", "Scenario: t")]
    fn prefixed_skips_empty_keyword(#[case] keyword: &str, #[case] text: &str, #[case] expected: &str) {
        assert_eq!(prefixed(keyword, text), expected);
    }
}
