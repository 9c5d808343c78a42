//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the fixture, builds the requested report tree and writes it out.

mod error;

pub use error::RunnerError;

use crate::cli::{Cli, Commands, OutputArgs, OutputFormat};
use crate::fixture::{self, Fixture};
use crate::report::{ReportNode, ReportTreeBuilder};
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Execute the parsed [`Cli`] command.
///
/// # Errors
///
/// Returns an error if the fixture cannot be loaded, the requested scenario
/// does not exist, or the output cannot be written.
pub fn run(cli: &Cli) -> Result<()> {
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Tree(OutputArgs::default()));
    let fixture = load_fixture(cli)?;
    let mut builder = ReportTreeBuilder::new(&fixture.providers, fixture.keywords.clone());
    match command {
        Commands::Tree(output) => {
            let tree = ReportNode::from(builder.build_story(&fixture.story));
            log_summary(&builder);
            write_output(cli, &output, &tree)
        }
        Commands::Count => {
            builder.build_story(&fixture.story);
            log_summary(&builder);
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", builder.leaf_count()).context("write leaf count")
        }
        Commands::Scenario { title, output } => {
            let scenario = fixture
                .story
                .scenarios
                .iter()
                .find(|s| s.title == title)
                .ok_or_else(|| RunnerError::ScenarioNotFound {
                    title: title.clone(),
                    story: fixture.story.name.clone(),
                })?;
            let tree = ReportNode::from(builder.build_scenario(scenario));
            log_summary(&builder);
            write_output(cli, &output, &tree)
        }
    }
}

fn load_fixture(cli: &Cli) -> Result<Fixture> {
    let path = cli.fixture_path();
    if !path.exists() {
        return Err(RunnerError::FixtureNotFound { path }.into());
    }
    fixture::from_path(&path).with_context(|| format!("loading fixture at {}", path.display()))
}

fn log_summary(builder: &ReportTreeBuilder) {
    debug!(
        leaves = builder.leaf_count(),
        omitted = builder.warnings().len(),
        "report tree built"
    );
}

/// Render `tree` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialisation fails.
pub fn render(tree: &ReportNode, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(tree.to_string()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(tree).context("serialising report tree")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn write_output(cli: &Cli, output: &OutputArgs, tree: &ReportNode) -> Result<()> {
    let rendered = render(tree, output.format)?;
    match &output.emit {
        Some(path) => {
            let resolved = resolve_output_path(cli, path);
            write_and_log(&resolved, &rendered)
                .with_context(|| format!("writing report tree to {}", resolved.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("write report tree to stdout")
        }
    }
}

/// Resolve `path` against `--directory` when it is relative.
fn resolve_output_path(cli: &Cli, path: &Path) -> PathBuf {
    match &cli.directory {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

/// Write `content` to `path` and log the file's location.
fn write_and_log(path: &Path, content: &str) -> io::Result<()> {
    fs::write(path, content)?;
    info!("Wrote report tree to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{SuiteNode, TestNode};
    use rstest::rstest;

    fn sample_tree() -> ReportNode {
        let mut suite = SuiteNode::new("Story");
        suite.push(TestNode::new("Given a").with_owner("Steps"));
        suite.into()
    }

    #[rstest]
    fn renders_text_outline() {
        let text = render(&sample_tree(), OutputFormat::Text).expect("render");
        assert_eq!(text, "+ Story\n  - Given a <Steps>\n");
    }

    #[rstest]
    fn renders_tagged_json() {
        let json = render(&sample_tree(), OutputFormat::Json).expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["kind"], "suite");
        assert_eq!(value["children"][0]["kind"], "test");
        assert_eq!(value["children"][0]["owner"], "Steps");
        assert!(value["children"][0].get("annotations").is_none());
    }

    #[rstest]
    #[case(Some("work"), "out.txt", "work/out.txt")]
    #[case(None, "out.txt", "out.txt")]
    #[case(Some("work"), "/abs/out.txt", "/abs/out.txt")]
    fn output_path_respects_directory(
        #[case] directory: Option<&str>,
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        let mut cli = Cli::try_parse_from_with_default(["storytree"]).expect("parse");
        cli.directory = directory.map(PathBuf::from);
        assert_eq!(
            resolve_output_path(&cli, Path::new(path)),
            PathBuf::from(expected)
        );
    }
}
