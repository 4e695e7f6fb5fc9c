//! Exemplar error types.
//!
//! Only failures that stop a run live here. Examples that fail or error are
//! ordinary [`Outcome`](crate::summary::Outcome)s and never surface as `Err`.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// INTERPRETER SESSION
// ============================================================================

/// The interpreter rejected an expression. Carries the interpreter's own text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for EvalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for EvalError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// The interpreter session itself is unusable.
#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error("failed to start interpreter `{command}`")]
    #[diagnostic(
        code(exemplar::session::spawn),
        help("check that `{command}` is installed and on your PATH")
    )]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("interpreter {0} was not captured")]
    #[diagnostic(code(exemplar::session::pipe))]
    MissingPipe(&'static str),

    #[error("I/O error while talking to the interpreter")]
    #[diagnostic(code(exemplar::session::io))]
    Io(#[from] io::Error),

    #[error("interpreter exited unexpectedly")]
    #[diagnostic(code(exemplar::session::closed))]
    Closed,

    #[error("session reload failed:\n{output}")]
    #[diagnostic(
        code(exemplar::session::reload),
        help("the modules under test must load cleanly before any example can run")
    )]
    Reload { output: String },

    #[error("interpreter preamble failed:\n{output}")]
    #[diagnostic(
        code(exemplar::session::preamble),
        help("check the `interpreter.preamble` lines in the configuration")
    )]
    Preamble { output: String },
}

/// Everything that can abort a run.
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Session(#[from] SessionError),

    #[error("failed to write the report")]
    #[diagnostic(code(exemplar::report))]
    Report(#[from] io::Error),
}

// ============================================================================
// INPUT FILES
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("failed to read manifest {}", path.display())]
    #[diagnostic(code(exemplar::manifest::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed manifest {}", path.display())]
    #[diagnostic(
        code(exemplar::manifest::syntax),
        help("a manifest is a YAML document with a top-level `modules` list")
    )]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to walk {}", path.display())]
    #[diagnostic(code(exemplar::manifest::walk))]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    #[diagnostic(code(exemplar::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config {}", path.display())]
    #[diagnostic(code(exemplar::config::syntax))]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid pattern in `{field}`")]
    #[diagnostic(code(exemplar::config::pattern))]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use miette::Report;

    use super::*;

    #[test]
    fn reload_error_carries_output_and_help() {
        let err = RunError::from(SessionError::Reload {
            output: "Foo.hs:3:1: error: parse error".to_string(),
        });
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("parse error"));
        assert!(output.contains("load cleanly"));
    }

    #[test]
    fn spawn_error_names_command() {
        let err = SessionError::Spawn {
            command: "ghci".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("ghci"));
    }

    #[test]
    fn eval_error_displays_message() {
        assert_eq!(EvalError::from("Variable not in scope: x").to_string(), "Variable not in scope: x");
    }
}
