//! Story model consumed by the report builder.
//!
//! Stories arrive already parsed; these types only describe their structure.
//! They deserialise from YAML fixtures:
//!
//! ```yaml
//! name: Login
//! scenarios:
//!   - title: Valid credentials
//!     steps:
//!       - Given a user
//!       - When they log in
//!     examples:
//!       - { role: admin }
//!     given_stories:
//!       - setup/accounts.story
//! ```
//!
//! ```rust
//! use storytree::model::Scenario;
//!
//! let scenario = Scenario::new("Valid credentials").with_steps(["Given a user"]);
//! assert!(!scenario.is_parameterised());
//! assert!(!scenario.has_given_stories());
//! ```

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize, de::Deserializer};

/// One example row: column name to value, in column order.
pub type ExampleRow = IndexMap<String, String>;

/// A named collection of scenarios.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Story {
    /// Display name of the story.
    pub name: String,
    /// Scenarios in story order.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Story {
    /// Create a story without scenarios.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenarios: Vec::new(),
        }
    }

    /// Append a scenario.
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }
}

/// A named sequence of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Scenario title.
    pub title: String,
    /// Raw step lines, possibly spanning several lines each.
    #[serde(default)]
    pub steps: Vec<String>,
    /// Parameter rows instantiating the scenario.
    #[serde(default)]
    pub examples: ExamplesTable,
    /// Stories run as setup for this scenario.
    #[serde(default)]
    pub given_stories: GivenStories,
}

impl Scenario {
    /// Create a scenario with no steps.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Replace the step lines.
    #[must_use]
    pub fn with_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps = steps.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the examples table.
    #[must_use]
    pub fn with_examples(mut self, examples: ExamplesTable) -> Self {
        self.examples = examples;
        self
    }

    /// Replace the given stories.
    #[must_use]
    pub fn with_given_stories(mut self, given_stories: GivenStories) -> Self {
        self.given_stories = given_stories;
        self
    }

    /// Whether the examples table has at least one row.
    #[must_use]
    pub fn is_parameterised(&self) -> bool {
        !self.examples.is_empty()
    }

    /// Whether the scenario references any given story.
    #[must_use]
    pub fn has_given_stories(&self) -> bool {
        !self.given_stories.paths.is_empty()
    }

    /// Whether each example row becomes its own node.
    ///
    /// Rows are expanded only when the given stories do not consume them as
    /// parameters.
    #[must_use]
    pub fn expands_examples(&self) -> bool {
        self.is_parameterised() && !self.given_stories.requires_parameters
    }
}

/// Ordered parameter rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ExamplesTable {
    rows: Vec<ExampleRow>,
}

impl ExamplesTable {
    /// Build a table from rows.
    #[must_use]
    pub const fn new(rows: Vec<ExampleRow>) -> Self {
        Self { rows }
    }

    /// Build a table from rows given as column/value pairs.
    #[must_use]
    pub fn from_pairs<'a, R, I>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|(k, v)| (k.to_owned(), v.to_owned()))
                        .collect()
                })
                .collect(),
        )
    }

    /// Rows in table order.
    #[must_use]
    pub fn rows(&self) -> &[ExampleRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render a row as `{col=value, col2=value2}` in column order.
#[must_use]
pub fn render_row(row: &ExampleRow) -> String {
    format!(
        "{{{}}}",
        row.iter().map(|(k, v)| format!("{k}={v}")).join(", ")
    )
}

/// References to stories used as setup.
///
/// Deserialises either from a bare list of paths, in which case
/// `requires_parameters` is inferred, or from a mapping with explicit fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GivenStories {
    /// Story paths, optionally carrying a `#fragment` anchor.
    pub paths: Vec<String>,
    /// Whether the given stories consume the scenario's example rows.
    pub requires_parameters: bool,
}

impl GivenStories {
    /// Build from paths, inferring parameter use from anchors.
    ///
    /// A path whose anchor is a `#{key:value}` parameter block selects its
    /// parameters from the scenario's example rows; plain `#fragment` anchors
    /// do not.
    ///
    /// ```
    /// use storytree::model::GivenStories;
    ///
    /// assert!(GivenStories::from_paths(["a.story#{id:1}"]).requires_parameters);
    /// assert!(!GivenStories::from_paths(["a.story", "b.story#intro"]).requires_parameters);
    /// ```
    #[must_use]
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        let requires_parameters = paths
            .iter()
            .any(|p| p.split_once('#').is_some_and(|(_, anchor)| has_anchor_parameters(anchor)));
        Self {
            paths,
            requires_parameters,
        }
    }

    /// Set `requires_parameters` explicitly.
    #[must_use]
    pub fn requiring_parameters(mut self, requires: bool) -> Self {
        self.requires_parameters = requires;
        self
    }
}

impl<'de> Deserialize<'de> for GivenStories {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Explicit {
            paths: Vec<String>,
            requires_parameters: Option<bool>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawGivenStories {
            Paths(Vec<String>),
            Explicit(Explicit),
        }

        Ok(match RawGivenStories::deserialize(deserializer)? {
            RawGivenStories::Paths(paths) => Self::from_paths(paths),
            RawGivenStories::Explicit(Explicit {
                paths,
                requires_parameters,
            }) => {
                let inferred = Self::from_paths(paths);
                match requires_parameters {
                    Some(flag) => inferred.requiring_parameters(flag),
                    None => inferred,
                }
            }
        })
    }
}

fn has_anchor_parameters(anchor: &str) -> bool {
    anchor
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .is_some_and(|params| !params.trim().is_empty())
}

/// Bare file name of a given-story path.
///
/// Any `#fragment` is removed first, then every leading directory component.
///
/// ```
/// use storytree::model::story_file_name;
///
/// assert_eq!(story_file_name("dir/sub/story.story#frag"), "story.story");
/// ```
#[must_use]
pub fn story_file_name(path: &str) -> &str {
    let without_anchor = path.split_once('#').map_or(path, |(head, _)| head);
    without_anchor
        .rsplit_once(['/', '\\'])
        .map_or(without_anchor, |(_, name)| name)
}
