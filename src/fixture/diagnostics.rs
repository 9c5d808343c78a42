//! Translates fixture parsing errors into diagnostics with source spans.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_saphyr::{Error as YamlError, Location};
use thiserror::Error;

use crate::steps::PatternError;

/// Errors raised while loading a fixture.
#[derive(Debug, Error, Diagnostic)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("failed to read fixture {path}")]
    #[diagnostic(code(storytree::fixture::read))]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The fixture is not valid YAML or does not fit the schema.
    #[error("fixture parse error")]
    #[diagnostic(code(storytree::fixture::parse))]
    Parse {
        /// Located YAML diagnostic.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },
    /// A step pattern declared by a provider is invalid.
    #[error("invalid step {pattern:?} in provider {owner}")]
    #[diagnostic(code(storytree::fixture::candidate))]
    Candidate {
        /// Provider declaring the step.
        owner: String,
        /// Pattern as written.
        pattern: String,
        /// Why the step was rejected.
        #[source]
        #[diagnostic_source]
        source: PatternError,
    },
}

/// A YAML error pointing into the fixture source.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(storytree::fixture::yaml))]
pub struct YamlDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("parse error here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    #[source]
    source: YamlError,
    message: String,
}

fn saturating_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn location_to_index(src: &str, loc: Location) -> usize {
    let target_line = saturating_usize(loc.line().saturating_sub(1));
    let target_column = saturating_usize(loc.column().saturating_sub(1));
    let mut offset = 0usize;
    for (idx, segment) in src.split_inclusive('\n').enumerate() {
        if idx == target_line {
            let line = segment.strip_suffix('\n').unwrap_or(segment);
            let byte_index = line
                .char_indices()
                .nth(target_column)
                .map_or(line.len(), |(byte_idx, _)| byte_idx);
            return offset + byte_index;
        }
        offset += segment.len();
    }
    src.len()
}

fn to_span(src: &str, loc: Location) -> SourceSpan {
    let at = location_to_index(src, loc);
    let len = usize::from(src.as_bytes().get(at).is_some_and(|b| *b != b'\n'));
    SourceSpan::new(at.into(), len)
}

fn has_tab_indent(src: &str, loc: Location) -> bool {
    let line_idx = saturating_usize(loc.line().saturating_sub(1));
    src.lines()
        .nth(line_idx)
        .unwrap_or_default()
        .chars()
        .take_while(|c| c.is_whitespace())
        .any(|c| c == '\t')
}

/// Wrap a YAML error with the fixture source and the failing location.
#[must_use]
pub fn map_yaml_error(err: YamlError, src: &str, name: &str) -> FixtureError {
    let loc = err.location();
    let (line, col) = loc.map_or((1, 1), |l| (l.line(), l.column()));
    let help = loc
        .filter(|l| has_tab_indent(src, *l))
        .map(|_| "Use spaces for indentation; tabs are invalid in YAML.".to_owned());
    let mut message = format!("YAML parse error in {name} at line {line}, column {col}: {err}");
    if let Some(hint) = &help {
        message.push_str("\nhelp: ");
        message.push_str(hint);
    }
    FixtureError::Parse {
        source: Box::new(YamlDiagnostic {
            src: NamedSource::new(name, src.to_owned()),
            span: loc.map(|l| to_span(src, l)),
            help,
            source: err,
            message,
        }),
    }
}
