//! Lifecycle hook registry.
//!
//! Hooks from all providers are flattened once, provider order first and
//! registration order second. Only the first hook of a stage is represented in
//! a report per scope, even when several are registered.

use crate::steps::{LifecycleStep, ScenarioType, Stage, StepProvider};

/// Scenario- and story-scoped hooks collected from every provider.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    normal: Vec<LifecycleStep>,
    example: Vec<LifecycleStep>,
    any: Vec<LifecycleStep>,
    story: Vec<LifecycleStep>,
}

impl HookRegistry {
    /// Flatten the hooks declared by `providers`.
    #[must_use]
    pub fn from_providers(providers: &[StepProvider]) -> Self {
        let mut registry = Self::default();
        for provider in providers {
            registry
                .normal
                .extend_from_slice(provider.scenario_hooks(ScenarioType::Normal));
            registry
                .example
                .extend_from_slice(provider.scenario_hooks(ScenarioType::Example));
            registry
                .any
                .extend_from_slice(provider.scenario_hooks(ScenarioType::Any));
            registry.story.extend_from_slice(&provider.story_hooks);
        }
        registry
    }

    /// Hooks registered for exactly `scenario_type`.
    #[must_use]
    pub fn scenario_hooks(&self, scenario_type: ScenarioType) -> &[LifecycleStep] {
        match scenario_type {
            ScenarioType::Normal => &self.normal,
            ScenarioType::Example => &self.example,
            ScenarioType::Any => &self.any,
        }
    }

    /// The story hook represented for `stage`, if any.
    #[must_use]
    pub fn story_hook(&self, stage: Stage) -> Option<&LifecycleStep> {
        first_matching(stage, &self.story)
    }

    /// The scenario hook represented for `stage` in scenarios of
    /// `scenario_type`.
    ///
    /// Type-specific hooks are considered before those registered for any
    /// scenario type.
    #[must_use]
    pub fn scenario_hook(&self, scenario_type: ScenarioType, stage: Stage) -> Option<&LifecycleStep> {
        first_matching(
            stage,
            self.scenario_hooks(scenario_type).iter().chain(&self.any),
        )
    }
}

/// Return the first hook in `steps` whose stage is `stage`.
pub fn first_matching<'a, I>(stage: Stage, steps: I) -> Option<&'a LifecycleStep>
where
    I: IntoIterator<Item = &'a LifecycleStep>,
{
    steps.into_iter().find(|step| step.stage == stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn hook(stage: Stage, owner: &str) -> LifecycleStep {
        LifecycleStep::new(stage, owner)
    }

    #[fixture]
    fn registry() -> HookRegistry {
        let first = StepProvider::new()
            .with_scenario_hook(ScenarioType::Any, hook(Stage::Before, "any_before"))
            .with_scenario_hook(ScenarioType::Normal, hook(Stage::After, "normal_after"))
            .with_story_hook(hook(Stage::After, "story_after"));
        let second = StepProvider::new()
            .with_scenario_hook(ScenarioType::Normal, hook(Stage::Before, "normal_before"))
            .with_scenario_hook(ScenarioType::Any, hook(Stage::After, "any_after"))
            .with_story_hook(hook(Stage::After, "story_after_2"));
        HookRegistry::from_providers(&[first, second])
    }

    #[rstest]
    #[case(ScenarioType::Normal, Stage::Before, Some("normal_before"))]
    #[case(ScenarioType::Normal, Stage::After, Some("normal_after"))]
    #[case(ScenarioType::Example, Stage::Before, Some("any_before"))]
    #[case(ScenarioType::Example, Stage::After, Some("any_after"))]
    #[case(ScenarioType::Any, Stage::Before, Some("any_before"))]
    fn type_specific_hooks_come_first(
        registry: HookRegistry,
        #[case] scenario_type: ScenarioType,
        #[case] stage: Stage,
        #[case] expected: Option<&str>,
    ) {
        let found = registry.scenario_hook(scenario_type, stage);
        assert_eq!(found.map(|h| h.owner.as_str()), expected);
    }

    #[rstest]
    fn story_hooks_keep_provider_order(registry: HookRegistry) {
        assert!(registry.story_hook(Stage::Before).is_none());
        let after = registry.story_hook(Stage::After).expect("after hook");
        assert_eq!(after.owner.as_str(), "story_after");
    }

    #[test]
    fn empty_registry_has_no_hooks() {
        let registry = HookRegistry::from_providers(&[]);
        assert!(registry.scenario_hook(ScenarioType::Normal, Stage::Before).is_none());
        assert!(registry.story_hook(Stage::After).is_none());
    }
}
