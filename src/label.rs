//! Report label helpers.
//!
//! Report consumers index children by their label and reserve parentheses for
//! their own rendering of parameterised names. Every label emitted into a
//! report tree therefore passes through [`safe_text`] and then through a
//! [`LabelUniquifier`] shared by the whole build session.
//!
//! # Examples
//!
//! ```
//! use storytree::label::{LabelUniquifier, safe_text};
//!
//! assert_eq!(safe_text("Given a (new)\nuser"), "Given a |new|, user");
//!
//! let mut labels = LabelUniquifier::default();
//! assert_eq!(labels.make_unique("When I log in"), "When I log in");
//! assert_eq!(labels.make_unique("When I log in"), "When I log in [2]");
//! ```

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

/// Separator that replaces line breaks in labels.
pub const LINE_JOINER: &str = ", ";

/// Replacement for the parenthesis characters reserved by report consumers.
pub const PAREN_REPLACEMENT: char = '|';

/// Render `text` as a single report-safe line.
///
/// Carriage returns become line feeds, runs of line feeds collapse into one,
/// each remaining line feed becomes [`LINE_JOINER`], and parentheses become
/// [`PAREN_REPLACEMENT`]. Applying the transform twice yields the same result
/// as applying it once.
#[must_use]
pub fn safe_text(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\r' { '\n' } else { c })
        .coalesce(|prev, next| {
            if prev == '\n' && next == '\n' {
                Ok(prev)
            } else {
                Err((prev, next))
            }
        })
        .fold(String::with_capacity(text.len()), |mut out, c| {
            match c {
                '\n' => out.push_str(LINE_JOINER),
                '(' | ')' => out.push(PAREN_REPLACEMENT),
                other => out.push(other),
            }
            out
        })
}

/// Return the first line of a step.
///
/// Multi-line steps carry tables or doc strings after the first line; only the
/// first line describes the step in the report. Both `\n` and `\r` end a line.
#[must_use]
pub fn first_line(text: &str) -> &str {
    text.split_once(['\r', '\n']).map_or(text, |(head, _)| head)
}

/// Hands out labels that never repeat within one build session.
///
/// The first request for a label returns it unchanged. Later requests for the
/// same base label receive a ` [n]` suffix, where `n` counts occurrences of
/// that base starting at 2. A suffixed candidate that collides with a label
/// already handed out is skipped, so every returned label is distinct from
/// every previously returned one.
#[derive(Debug, Default, Clone)]
pub struct LabelUniquifier {
    occurrences: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl LabelUniquifier {
    /// Create an empty uniquifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `text` report-safe and distinct from all labels issued so far.
    pub fn make_unique(&mut self, text: &str) -> String {
        let base = safe_text(text);
        let seen = self.occurrences.entry(base.clone()).or_insert(0);
        let mut label = if *seen == 0 {
            base.clone()
        } else {
            format!("{base} [{}]", *seen + 1)
        };
        *seen += 1;
        while self.issued.contains(&label) {
            *seen += 1;
            label = format!("{base} [{}]", *seen);
        }
        self.issued.insert(label.clone());
        label
    }
}
