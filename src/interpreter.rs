//! The interpreter session the engine drives.
//!
//! There is exactly one session per run. It is owned by the caller and lent to
//! the runner by `&mut` reference; requests are strictly sequential.

use crate::errors::{EvalError, SessionError};

pub mod process;

pub use process::ProcessInterpreter;

/// A persistent interpreter session.
pub trait Interpreter {
    /// Drops session-local bindings and reloads the modules under test.
    fn reload(&mut self) -> Result<(), SessionError>;

    /// Evaluates one expression, returning its textual output.
    ///
    /// Interpreter-level problems (syntax errors, exceptions, unbound names)
    /// come back as `Err`, never as a panic.
    fn evaluate(&mut self, expression: &str) -> Result<String, EvalError>;
}
