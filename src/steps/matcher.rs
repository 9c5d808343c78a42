//! Step-to-candidate matching.

use crate::keywords::{Keywords, StepType};

use super::StepCandidate;

/// Outcome of a successful match.
#[derive(Debug, Clone, Copy)]
pub struct StepMatch<'a> {
    /// The first candidate that accepted the step.
    pub candidate: &'a StepCandidate,
    /// Type of the most recent non-`And` step after this one.
    pub preceding: Option<StepType>,
}

/// Find the first candidate implementing `step`.
///
/// Candidates are tried in order. `preceding` is the type of the last non-`And`
/// step matched earlier in the same sequence; the returned
/// [`StepMatch::preceding`] carries it forward, updated to the matched
/// candidate's type unless that type is `And`. `None` means no candidate
/// applies, which the caller reports as pending or ignorable.
#[must_use]
pub fn find_match<'a>(
    candidates: &'a [StepCandidate],
    step: &str,
    preceding: Option<StepType>,
    keywords: &Keywords,
) -> Option<StepMatch<'a>> {
    let candidate = candidates
        .iter()
        .find(|c| c.matches(step, preceding, keywords))?;
    let preceding = match candidate.step_type() {
        StepType::And => preceding,
        other => Some(other),
    };
    Some(StepMatch {
        candidate,
        preceding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn candidates() -> Vec<StepCandidate> {
        vec![
            StepCandidate::new(StepType::Given, "a $thing", "First").expect("candidate"),
            StepCandidate::new(StepType::Given, "a user", "Second").expect("candidate"),
            StepCandidate::new(StepType::Then, "a user", "Third").expect("candidate"),
            StepCandidate::new(StepType::And, "also $x", "Fourth").expect("candidate"),
        ]
    }

    #[rstest]
    fn first_registered_candidate_wins(candidates: Vec<StepCandidate>) {
        let found = find_match(&candidates, "Given a user", None, &Keywords::default())
            .expect("match");
        assert_eq!(found.candidate.owner().as_str(), "First");
        assert_eq!(found.preceding, Some(StepType::Given));
    }

    #[rstest]
    fn and_step_resolves_against_preceding(candidates: Vec<StepCandidate>) {
        let keywords = Keywords::default();
        let found = find_match(&candidates, "And a user", Some(StepType::Then), &keywords)
            .expect("match");
        assert_eq!(found.candidate.owner().as_str(), "Third");
        assert_eq!(found.preceding, Some(StepType::Then));
    }

    #[rstest]
    fn and_candidate_keeps_preceding(candidates: Vec<StepCandidate>) {
        let found = find_match(
            &candidates,
            "And also this",
            Some(StepType::When),
            &Keywords::default(),
        )
        .expect("match");
        assert_eq!(found.candidate.owner().as_str(), "Fourth");
        assert_eq!(found.preceding, Some(StepType::When));
    }

    #[rstest]
    fn and_step_without_preceding_needs_and_candidate(candidates: Vec<StepCandidate>) {
        assert!(find_match(&candidates, "And a user", None, &Keywords::default()).is_none());
    }

    #[rstest]
    fn unmatched_step_yields_none(candidates: Vec<StepCandidate>) {
        assert!(find_match(&candidates, "When nothing fits", None, &Keywords::default()).is_none());
    }
}
