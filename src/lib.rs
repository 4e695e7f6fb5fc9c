//! Exemplar replays interactive examples recorded next to source code against
//! a live interpreter session and reports where the interpreter disagrees.
//!
//! The engine consumes already-extracted [`Module`]s and a running
//! [`Interpreter`]; it drives every group through the session, compares
//! outputs, and streams a live report to stderr, returning the final
//! [`Summary`].

pub mod cli;
pub mod compare;
pub mod config;
pub mod errors;
pub mod interpreter;
pub mod manifest;
pub mod model;
pub mod property;
pub mod report;
pub mod runner;
pub mod summary;
pub mod template;

pub use compare::{Comparison, ComparisonStrategy};
pub use errors::{EvalError, RunError, SessionError};
pub use interpreter::{Interpreter, ProcessInterpreter};
pub use model::{Interaction, Located, Location, Module, TestItem};
pub use property::{PropertyChecker, QuickCheckProperties};
pub use report::{ReportState, Reporter};
pub use runner::{run_modules, Runner, SetupAction};
pub use summary::{Outcome, Summary};
