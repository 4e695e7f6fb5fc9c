//! Replays modules against the interpreter session.
//!
//! The call chain is `run_modules` → [`Runner::run_module`] →
//! [`Runner::run_group`] → [`Comparison::check`]. Every outcome is recorded in
//! the [`ReportState`] owned by the runner; nothing here runs concurrently.

use termcolor::WriteColor;

use crate::compare::{Attributed, Comparison, Verdict};
use crate::errors::RunError;
use crate::interpreter::Interpreter;
use crate::model::{count_examples, Interaction, Located, Module, TestItem};
use crate::property::PropertyChecker;
use crate::report::{ReportState, Reporter};
use crate::summary::{Outcome, Summary};

/// What to do to the session before a group (and before each property).
#[derive(Debug, Clone, Copy)]
pub enum SetupAction<'a> {
    Reload,
    /// Reload, then re-evaluate the module's setup examples, ignoring results.
    ReloadAndReplay(&'a [TestItem]),
}

/// Drives one interpreter session through a run.
pub struct Runner<'i, I, P, W> {
    interpreter: &'i mut I,
    properties: P,
    comparison: Comparison,
    state: ReportState<W>,
}

impl<'i, I, P, W> Runner<'i, I, P, W>
where
    I: Interpreter,
    P: PropertyChecker,
    W: WriteColor,
{
    pub fn new(interpreter: &'i mut I, properties: P, comparison: Comparison, state: ReportState<W>) -> Self {
        Self {
            interpreter,
            properties,
            comparison,
            state,
        }
    }

    pub fn summary(&self) -> Summary {
        self.state.summary()
    }

    pub fn into_state(self) -> ReportState<W> {
        self.state
    }

    /// Runs every module in order and prints the final summary.
    pub fn run_all(&mut self, modules: &[Module]) -> Result<Summary, RunError> {
        for module in modules {
            self.run_module(module)?;
        }
        self.state.report_summary()?;
        Ok(self.state.summary())
    }

    /// Runs a module's setup, then its groups if the setup was clean.
    #[tracing::instrument(skip_all, fields(module = %module.name))]
    pub fn run_module(&mut self, module: &Module) -> Result<(), RunError> {
        let before = self.state.summary();
        if let Some(setup) = &module.setup {
            self.run_group(SetupAction::Reload, setup)?;
        }
        let after = self.state.summary();
        if (before.errors, before.failures) != (after.errors, after.failures) {
            tracing::debug!(groups = module.groups.len(), "setup failed, skipping example groups");
            return Ok(());
        }

        let setup = module.setup.as_deref().unwrap_or(&[]);
        for group in &module.groups {
            self.run_group(SetupAction::ReloadAndReplay(setup), group)?;
        }
        Ok(())
    }

    /// Runs one group: its examples in order, then its properties in order.
    pub fn run_group(&mut self, setup: SetupAction<'_>, items: &[TestItem]) -> Result<(), RunError> {
        self.state.report_progress()?;
        self.perform(setup)?;

        for item in items {
            if let TestItem::Example(interactions) = item {
                self.run_example(interactions)?;
            }
        }

        for item in items {
            if let TestItem::Property(property) = item {
                self.perform(setup)?;
                let outcome = self.properties.check(&mut *self.interpreter, &property.value);
                self.state.record(&property.location, &property.value, outcome)?;
            }
        }
        Ok(())
    }

    /// Runs an interaction chain, stopping at the first one that does not succeed.
    fn run_example(&mut self, interactions: &[Located<Interaction>]) -> Result<(), RunError> {
        for Located { location, value: interaction } in interactions {
            let passed = match self.comparison.check(&mut *self.interpreter, interaction) {
                Ok(Verdict::Match) => {
                    self.state.record(location, &interaction.expression, Outcome::Success)?;
                    true
                }
                Ok(Verdict::Mismatch(diagnostic)) => {
                    self.state
                        .record(location, &interaction.expression, Outcome::Failure(diagnostic))?;
                    false
                }
                Err(Attributed { expression, message }) => {
                    self.state.record(location, &expression, Outcome::Error(message))?;
                    false
                }
            };
            if !passed {
                break;
            }
        }
        Ok(())
    }

    fn perform(&mut self, setup: SetupAction<'_>) -> Result<(), RunError> {
        self.interpreter.reload()?;
        let SetupAction::ReloadAndReplay(items) = setup else {
            return Ok(());
        };
        for item in items {
            let TestItem::Example(interactions) = item else {
                continue;
            };
            for interaction in interactions {
                if let Err(e) = self.interpreter.evaluate(&interaction.value.expression) {
                    tracing::debug!(location = %interaction.location, error = %e, "setup replay failed");
                }
            }
        }
        Ok(())
    }
}

/// Runs all modules and returns the final summary.
pub fn run_modules<I, P, W>(
    interpreter: &mut I,
    properties: P,
    comparison: Comparison,
    reporter: Reporter<W>,
    modules: &[Module],
) -> Result<Summary, RunError>
where
    I: Interpreter,
    P: PropertyChecker,
    W: WriteColor,
{
    let state = ReportState::new(reporter, count_examples(modules));
    Runner::new(interpreter, properties, comparison, state).run_all(modules)
}
