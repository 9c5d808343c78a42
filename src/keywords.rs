//! Story keywords.
//!
//! [`Keywords`] classifies raw step text by its starting word and supplies the
//! fixed display keywords used for scenario and example-row labels. The
//! defaults are the English keyword set; fixtures may override any of them.
//!
//! ```
//! use storytree::keywords::{Keywords, StepType};
//!
//! let keywords = Keywords::default();
//! assert_eq!(keywords.step_type_for("And the door opens").ok(), Some(StepType::And));
//! assert!(keywords.step_type_for("Perhaps later").is_err());
//! ```

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of a step, derived from its starting keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    /// A precondition.
    Given,
    /// An action.
    When,
    /// An expected outcome.
    Then,
    /// Continues the most recent non-`And` step.
    And,
    /// A commented-out step that is reported but never run.
    Ignorable,
}

/// Errors raised while classifying step text.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum KeywordError {
    /// No configured starting word begins the step.
    #[error("no starting word found in step {step:?}")]
    #[diagnostic(
        code(storytree::keywords::starting_word_not_found),
        help("steps must begin with a configured keyword such as Given, When, Then or And")
    )]
    StartingWordNotFound {
        /// The offending step text.
        step: String,
    },
}

/// Configurable keyword set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Keywords {
    /// Prefix for scenario labels.
    pub scenario: String,
    /// Prefix for example-row labels.
    pub examples_table_row: String,
    /// Starting word of `Given` steps.
    pub given: String,
    /// Starting word of `When` steps.
    pub when: String,
    /// Starting word of `Then` steps.
    pub then: String,
    /// Starting word of `And` steps.
    pub and: String,
    /// Prefix marking a step as ignorable.
    pub ignorable: String,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            scenario: "Scenario:".into(),
            examples_table_row: "Example:".into(),
            given: "Given".into(),
            when: "When".into(),
            then: "Then".into(),
            and: "And".into(),
            ignorable: "!--".into(),
        }
    }
}

impl Keywords {
    /// Display keyword that prefixes scenario labels.
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Display keyword that prefixes example-row labels.
    #[must_use]
    pub fn examples_table_row(&self) -> &str {
        &self.examples_table_row
    }

    /// The starting word configured for `step_type`.
    #[must_use]
    pub fn starting_word(&self, step_type: StepType) -> &str {
        match step_type {
            StepType::Given => &self.given,
            StepType::When => &self.when,
            StepType::Then => &self.then,
            StepType::And => &self.and,
            StepType::Ignorable => &self.ignorable,
        }
    }

    /// Classify `step` by its starting word.
    ///
    /// Keywords are tried in the order `Given`, `When`, `Then`, `And`,
    /// ignorable. A keyword matches when the step starts with it and the next
    /// character is whitespace or the end of the text; the ignorable marker
    /// matches as a plain prefix.
    ///
    /// # Errors
    ///
    /// Returns [`KeywordError::StartingWordNotFound`] when no keyword matches.
    pub fn step_type_for(&self, step: &str) -> Result<StepType, KeywordError> {
        [
            StepType::Given,
            StepType::When,
            StepType::Then,
            StepType::And,
            StepType::Ignorable,
        ]
        .into_iter()
        .find(|ty| self.strip_starting_word(step, *ty).is_some())
        .ok_or_else(|| KeywordError::StartingWordNotFound {
            step: step.to_owned(),
        })
    }

    /// Remove the starting word for `step_type` and any following whitespace.
    ///
    /// Returns `None` when `step` does not start with that word.
    #[must_use]
    pub fn strip_starting_word<'a>(&self, step: &'a str, step_type: StepType) -> Option<&'a str> {
        let word = self.starting_word(step_type);
        if word.is_empty() {
            return None;
        }
        let rest = step.strip_prefix(word)?;
        if step_type == StepType::Ignorable {
            return Some(rest.trim_start());
        }
        match rest.chars().next() {
            None => Some(rest),
            Some(c) if c.is_whitespace() => Some(rest.trim_start()),
            Some(_) => None,
        }
    }
}
