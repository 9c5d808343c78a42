//! Step implementations as seen by the report builder.
//!
//! A [`StepProvider`] stands for one class of step implementations: the
//! candidates it registers and its lifecycle steps. The builder consumes these
//! read-only; nothing here runs a step.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::keywords::{Keywords, StepType};

pub mod matcher;
mod pattern;

pub use matcher::{StepMatch, find_match};
pub use pattern::{PatternError, StepPattern};

/// Opaque identity of the code that implements a step or hook.
///
/// Report consumers use it to navigate from a test node back to its source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wrap an owner identity.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// When a lifecycle step runs relative to its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Before the story or scenario.
    Before,
    /// After the story or scenario.
    After,
}

/// Which scenarios a scenario-scoped lifecycle step applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    /// Scenarios run once, without example rows.
    Normal,
    /// Each example row of a parameterised scenario.
    Example,
    /// Every scenario regardless of type.
    Any,
}

/// A before or after hook.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LifecycleStep {
    /// Whether the hook runs before or after its scope.
    pub stage: Stage,
    /// Method implementing the hook.
    pub owner: OwnerId,
    /// Metadata passed through to the report node untouched.
    #[serde(default)]
    pub annotations: Vec<String>,
}

impl LifecycleStep {
    /// Create a hook without annotations.
    #[must_use]
    pub fn new(stage: Stage, owner: impl Into<OwnerId>) -> Self {
        Self {
            stage,
            owner: owner.into(),
            annotations: Vec::new(),
        }
    }

    /// Attach passthrough annotations.
    #[must_use]
    pub fn with_annotations<I, S>(mut self, annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotations = annotations.into_iter().map(Into::into).collect();
        self
    }
}

/// A registered step implementation.
///
/// A candidate is composite when it expands into further step lines instead of
/// running code itself.
#[derive(Debug, Clone)]
pub struct StepCandidate {
    step_type: StepType,
    pattern: StepPattern,
    owner: OwnerId,
    composed: Vec<String>,
}

impl StepCandidate {
    /// Register an implementation for steps of `step_type` matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern does not compile or the type is
    /// [`StepType::Ignorable`].
    pub fn new(
        step_type: StepType,
        pattern: &str,
        owner: impl Into<OwnerId>,
    ) -> Result<Self, PatternError> {
        if step_type == StepType::Ignorable {
            return Err(PatternError::IgnorableCandidate {
                pattern: pattern.to_owned(),
            });
        }
        Ok(Self {
            step_type,
            pattern: StepPattern::parse(pattern)?,
            owner: owner.into(),
            composed: Vec::new(),
        })
    }

    /// Turn the candidate into a composite expanding into `steps`.
    #[must_use]
    pub fn with_composed_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.composed = steps.into_iter().map(Into::into).collect();
        self
    }

    /// Step type whose starting word this candidate answers to.
    #[must_use]
    pub const fn step_type(&self) -> StepType {
        self.step_type
    }

    /// Identity of the implementing code.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Whether the candidate expands into other steps.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        !self.composed.is_empty()
    }

    /// Step lines a composite expands into, in order.
    #[must_use]
    pub fn composed_steps(&self) -> &[String] {
        &self.composed
    }

    /// Whether this candidate implements `step`.
    ///
    /// An `And` step is resolved against `preceding`, the type of the most
    /// recent non-`And` step matched in the same sequence. `And` candidates
    /// accept any `And` step.
    #[must_use]
    pub fn matches(&self, step: &str, preceding: Option<StepType>, keywords: &Keywords) -> bool {
        let Ok(written) = keywords.step_type_for(step) else {
            return false;
        };
        let type_matches = match written {
            StepType::Ignorable => false,
            StepType::And => {
                self.step_type == StepType::And || preceding == Some(self.step_type)
            }
            other => other == self.step_type,
        };
        type_matches
            && keywords
                .strip_starting_word(step, written)
                .is_some_and(|body| self.pattern.is_match(body))
    }
}

/// One source of step implementations and hooks.
#[derive(Debug, Clone, Default)]
pub struct StepProvider {
    /// Candidates in registration order.
    pub candidates: Vec<StepCandidate>,
    /// Scenario-scoped hooks, grouped by the scenario type they apply to.
    pub scenario_hooks: IndexMap<ScenarioType, Vec<LifecycleStep>>,
    /// Story-scoped hooks in registration order.
    pub story_hooks: Vec<LifecycleStep>,
}

impl StepProvider {
    /// Create a provider with no candidates or hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate.
    #[must_use]
    pub fn with_candidate(mut self, candidate: StepCandidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Append a scenario-scoped hook for `scenario_type`.
    #[must_use]
    pub fn with_scenario_hook(mut self, scenario_type: ScenarioType, hook: LifecycleStep) -> Self {
        self.scenario_hooks.entry(scenario_type).or_default().push(hook);
        self
    }

    /// Append a story-scoped hook.
    #[must_use]
    pub fn with_story_hook(mut self, hook: LifecycleStep) -> Self {
        self.story_hooks.push(hook);
        self
    }

    /// Scenario-scoped hooks registered for exactly `scenario_type`.
    #[must_use]
    pub fn scenario_hooks(&self, scenario_type: ScenarioType) -> &[LifecycleStep] {
        self.scenario_hooks
            .get(&scenario_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
