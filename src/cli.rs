//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Preview the report tree built from a story fixture.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the fixture file describing the story and its step providers.
    #[arg(short, long, value_name = "FILE", default_value = "stories.yml")]
    pub file: PathBuf,

    /// Change to this directory before doing anything.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `tree` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `tree` as the default command.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::parse().with_default_command()
    }

    /// Parse the provided arguments, applying the default command when needed.
    ///
    /// # Errors
    ///
    /// Returns the clap error when the arguments are invalid.
    pub fn try_parse_from_with_default<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::with_default_command)
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Tree(OutputArgs::default()));
        }
        self
    }

    /// Fixture path with `--directory` applied.
    #[must_use]
    pub fn fixture_path(&self) -> PathBuf {
        self.directory
            .as_ref()
            .map_or_else(|| self.file.clone(), |dir| dir.join(&self.file))
    }
}

/// Rendering of a report tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented outline.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Output options shared by tree-printing commands.
#[derive(Debug, Args, Default, PartialEq, Eq, Clone)]
pub struct OutputArgs {
    /// How to render the tree.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the rendered tree to this path instead of standard output.
    #[arg(long, value_name = "FILE")]
    pub emit: Option<PathBuf>,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Print the report tree of the whole story. This is the default command.
    Tree(OutputArgs),

    /// Print the number of leaves the story contributes.
    Count,

    /// Print the report tree of a single scenario.
    Scenario {
        /// Title of the scenario, as written in the fixture.
        title: String,

        /// Output options.
        #[command(flatten)]
        output: OutputArgs,
    },
}
