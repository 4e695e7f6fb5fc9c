//! The exemplar Command-Line Interface.
//!
//! This module is the main entry point of the binary and wires configuration,
//! manifests, the interpreter session and the report together.

use std::process;

use clap::Parser;
use termcolor::ColorChoice;

use crate::cli::args::ExemplarArgs;
use crate::compare::Comparison;
use crate::config::Config;
use crate::interpreter::ProcessInterpreter;
use crate::manifest::load_all;
use crate::property::QuickCheckProperties;
use crate::report::Reporter;
use crate::runner::run_modules;
use crate::summary::Summary;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = ExemplarArgs::parse();

    match execute(args) {
        Ok(summary) if summary.is_success() => process::exit(0),
        Ok(_) => process::exit(1),
        Err(report) => {
            eprintln!("{:?}", report);
            process::exit(1);
        }
    }
}

/// Applies command-line overrides on top of the loaded configuration.
pub fn resolve_config(args: &ExemplarArgs) -> miette::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(command) = &args.interpreter {
        config.interpreter.command = command.clone();
    }
    if let Some(strategy) = args.strategy {
        config.comparison.strategy = strategy;
    }
    Ok(config)
}

/// Runs everything the arguments describe. The interpreter is dropped (and
/// killed) before this returns.
fn execute(args: ExemplarArgs) -> miette::Result<Summary> {
    let config = resolve_config(&args)?;
    let modules = load_all(&args.paths)?;
    let properties = QuickCheckProperties::from_config(&config.properties)?;
    let comparison = Comparison::from_config(&config.comparison);
    tracing::info!(
        modules = modules.len(),
        strategy = ?comparison.strategy,
        "starting run"
    );

    let mut interpreter = ProcessInterpreter::spawn(config.interpreter)?;
    let reporter = Reporter::stderr(ColorChoice::from(args.color));
    let summary = run_modules(&mut interpreter, properties, comparison, reporter, &modules)?;

    if args.json {
        output::print_summary_json(&summary).map_err(crate::errors::RunError::Report)?;
    }
    Ok(summary)
}
