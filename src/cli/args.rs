//! Defines the command-line arguments for the exemplar CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use termcolor::ColorChoice;

use crate::compare::ComparisonStrategy;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "exemplar",
    version,
    about = "Replays interactive examples against a live interpreter session."
)]
pub struct ExemplarArgs {
    /// Manifest files or directories containing them.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// YAML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Interpreter command, overriding the configuration.
    #[arg(long, value_name = "CMD")]
    pub interpreter: Option<String>,

    /// How expected and actual output are compared.
    #[arg(long, value_enum)]
    pub strategy: Option<ComparisonStrategy>,

    /// When to color the report.
    #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
    pub color: ColorArg,

    /// Print the final summary as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        }
    }
}
