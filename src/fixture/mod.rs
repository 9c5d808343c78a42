//! Fixture loading.
//!
//! A fixture bundles an already-structured story with the step providers and
//! keywords used to build its report tree:
//!
//! ```yaml
//! keywords:
//!   scenario: "Scenario:"
//! providers:
//!   - name: LoginSteps
//!     steps:
//!       - { type: given, pattern: "a user named $name" }
//!       - type: when
//!         pattern: they sign in
//!         composed: ["When they open the login page", "When they submit"]
//!     hooks:
//!       - { scope: normal, stage: before, method: reset_session }
//!       - { scope: story, stage: after, method: close_browser }
//! story:
//!   name: Login
//!   scenarios:
//!     - title: Valid credentials
//!       steps: ["Given a user named Bob", "When they sign in"]
//! ```
//!
//! Hook owners are rendered as `<provider>::<method>`; step owners are the
//! provider name.

use std::{fs, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::keywords::{Keywords, StepType};
use crate::model::Story;
use crate::steps::{LifecycleStep, OwnerId, ScenarioType, Stage, StepCandidate, StepProvider};

mod diagnostics;

pub use diagnostics::{FixtureError, YamlDiagnostic, map_yaml_error};

/// A loaded fixture.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Keywords for classification and labels.
    pub keywords: Keywords,
    /// Providers in declaration order.
    pub providers: Vec<StepProvider>,
    /// The story to report on.
    pub story: Story,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFixture {
    #[serde(default)]
    keywords: Keywords,
    #[serde(default)]
    providers: Vec<RawProvider>,
    story: Story,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProvider {
    name: String,
    #[serde(default)]
    steps: Vec<RawStep>,
    #[serde(default)]
    hooks: Vec<RawHook>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    #[serde(rename = "type")]
    step_type: StepType,
    pattern: String,
    #[serde(default)]
    composed: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum HookScope {
    Story,
    Normal,
    Example,
    Any,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHook {
    scope: HookScope,
    stage: Stage,
    method: String,
    #[serde(default)]
    annotations: Vec<String>,
}

impl RawProvider {
    fn into_provider(self) -> Result<StepProvider, FixtureError> {
        let mut provider = StepProvider::new();
        for step in self.steps {
            let candidate = StepCandidate::new(step.step_type, &step.pattern, self.name.as_str())
                .map_err(|source| FixtureError::Candidate {
                    owner: self.name.clone(),
                    pattern: step.pattern.clone(),
                    source,
                })?;
            provider = provider.with_candidate(candidate.with_composed_steps(step.composed));
        }
        for hook in self.hooks {
            let owner = OwnerId::new(format!("{}::{}", self.name, hook.method));
            let step = LifecycleStep::new(hook.stage, owner).with_annotations(hook.annotations);
            provider = match hook.scope {
                HookScope::Story => provider.with_story_hook(step),
                HookScope::Normal => provider.with_scenario_hook(ScenarioType::Normal, step),
                HookScope::Example => provider.with_scenario_hook(ScenarioType::Example, step),
                HookScope::Any => provider.with_scenario_hook(ScenarioType::Any, step),
            };
        }
        Ok(provider)
    }
}

fn from_str_named(yaml: &str, name: &str) -> Result<Fixture, FixtureError> {
    let raw: RawFixture =
        serde_saphyr::from_str(yaml).map_err(|e| map_yaml_error(e, yaml, name))?;
    let providers = raw
        .providers
        .into_iter()
        .map(RawProvider::into_provider)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        fixture = name,
        providers = providers.len(),
        scenarios = raw.story.scenarios.len(),
        "loaded fixture"
    );
    Ok(Fixture {
        keywords: raw.keywords,
        providers,
        story: raw.story,
    })
}

/// Parse a fixture from YAML text.
///
/// # Errors
///
/// Returns [`FixtureError::Parse`] for malformed YAML or unknown fields and
/// [`FixtureError::Candidate`] for invalid step patterns.
pub fn from_str(yaml: &str) -> Result<Fixture, FixtureError> {
    from_str_named(yaml, "fixture")
}

/// Load a fixture from `path`.
///
/// # Errors
///
/// Returns [`FixtureError::Read`] if the file cannot be read, otherwise the
/// errors of [`from_str`].
pub fn from_path(path: impl AsRef<Path>) -> Result<Fixture, FixtureError> {
    let path_ref = path.as_ref();
    let data = fs::read_to_string(path_ref).map_err(|source| FixtureError::Read {
        path: path_ref.display().to_string(),
        source,
    })?;
    from_str_named(&data, &path_ref.display().to_string())
}
