//! Step patterns with `$name` parameters.

use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

/// Errors raised when building step candidates.
#[derive(Debug, Error, Diagnostic)]
pub enum PatternError {
    /// The pattern could not be compiled.
    #[error("invalid step pattern {pattern:?}")]
    #[diagnostic(code(storytree::steps::invalid_pattern))]
    InvalidPattern {
        /// Pattern as written.
        pattern: String,
        /// Underlying regex failure.
        #[source]
        source: regex::Error,
    },
    /// Ignorable steps are never implemented, so no candidate may claim them.
    #[error("step candidate {pattern:?} cannot have the ignorable type")]
    #[diagnostic(code(storytree::steps::ignorable_candidate))]
    IgnorableCandidate {
        /// Pattern as written.
        pattern: String,
    },
}

/// A compiled step pattern.
///
/// Literal text must match exactly, except that any run of whitespace matches
/// any other run of whitespace. Each `$name` token (a `$` followed by word
/// characters) captures any text, line breaks included. The pattern is
/// anchored at both ends.
///
/// ```
/// use storytree::steps::StepPattern;
///
/// let pattern = StepPattern::parse("a user named $name").expect("pattern");
/// assert!(pattern.is_match("a user named Bob"));
/// assert!(!pattern.is_match("a user"));
/// ```
#[derive(Debug, Clone)]
pub struct StepPattern {
    regex: Regex,
}

impl StepPattern {
    /// Compile `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidPattern`] if the generated expression is
    /// rejected by the regex engine.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let expr = format!("(?s)^{}$", to_regex_body(pattern));
        let regex = Regex::new(&expr).map_err(|source| PatternError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Whether `text` (with its starting word removed) satisfies the pattern.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text.trim_end())
    }
}

fn is_param_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn to_regex_body(pattern: &str) -> String {
    let mut body = String::with_capacity(pattern.len() + 8);
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' && chars.peek().is_some_and(|next| is_param_char(*next)) {
            while chars.next_if(|next| is_param_char(*next)).is_some() {}
            push_literal(&mut body, &literal);
            literal.clear();
            body.push_str("(.*)");
        } else {
            literal.push(c);
        }
    }
    push_literal(&mut body, &literal);
    body
}

fn push_literal(body: &mut String, literal: &str) {
    let mut pieces = literal.split(char::is_whitespace).peekable();
    while let Some(piece) = pieces.next() {
        body.push_str(&regex::escape(piece));
        if pieces.peek().is_some() {
            body.push_str(r"\s+");
            while pieces.next_if(|p| p.is_empty()).is_some() {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a user", "a user", true)]
    #[case("a user", "a user ", true)]
    #[case("a user", "a user logs in", false)]
    #[case("a user named $name", "a user named Bob", true)]
    #[case("$count items cost $price", "3 items cost 4.50", true)]
    #[case("$count items cost $price", "3 items", false)]
    #[case("a table", "a table\n|a|b|", false)]
    #[case("a table $rows", "a table with\n|a|b|", true)]
    #[case("a table $rows", "a table\n|a|b|", true)]
    #[case("two  spaces", "two spaces", true)]
    #[case("one space", "one\t\tspace", true)]
    #[case("joined", "join ed", false)]
    #[case("costs $amount (net)", "costs 5 (net)", true)]
    #[case("price is $ only", "price is $ only", true)]
    #[case("dots . and [brackets]", "dots . and [brackets]", true)]
    #[case("dots . and [brackets]", "dots x and [brackets]", false)]
    fn matches_literals_and_parameters(
        #[case] pattern: &str,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        let compiled = StepPattern::parse(pattern).expect("pattern");
        assert_eq!(compiled.is_match(text), expected, "{pattern} vs {text:?}");
    }
}
