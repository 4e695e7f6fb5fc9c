//! Run configuration.
//!
//! Loaded from a YAML file; every field has a default, and the defaults drive
//! GHCi. Command-line flags are applied on top by the CLI.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::compare::ComparisonStrategy;
use crate::errors::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub interpreter: InterpreterConfig,
    pub properties: PropertyConfig,
    pub comparison: ComparisonConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Syntax {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// How to start and talk to the interpreter subprocess.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpreterConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Lines sent once after the process starts.
    pub preamble: Vec<String>,
    /// Command that resets the session.
    pub reload: String,
    /// Line that marks the end of a response.
    pub sentinel: String,
    /// Command that makes the interpreter print the sentinel.
    pub sentinel_command: String,
    /// Output matching this pattern is an evaluation error.
    pub error_pattern: String,
    /// Delimiters wrapped around expressions that span several lines.
    pub block_open: Option<String>,
    pub block_close: Option<String>,
}

impl InterpreterConfig {
    pub fn error_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.error_pattern).map_err(|source| ConfigError::Pattern {
            field: "interpreter.error_pattern",
            source,
        })
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        const SENTINEL: &str = "--exemplar-done--";
        Self {
            command: "ghci".to_string(),
            args: vec!["-v0".to_string(), "-ignore-dot-ghci".to_string()],
            preamble: vec![
                ":set prompt \"\"".to_string(),
                ":set prompt-cont \"\"".to_string(),
                "System.IO.hSetBuffering System.IO.stdout System.IO.LineBuffering".to_string(),
                "GHC.IO.Handle.hDuplicateTo System.IO.stdout System.IO.stderr".to_string(),
            ],
            reload: ":reload".to_string(),
            sentinel: SENTINEL.to_string(),
            sentinel_command: format!("System.IO.putStrLn \"{}\"", SENTINEL),
            error_pattern: r"(?m)^(\S+:\d+:\d+: error|\*\*\* Exception: )".to_string(),
            block_open: Some(":{".to_string()),
            block_close: Some(":}".to_string()),
        }
    }
}

/// How properties are turned into interpreter expressions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropertyConfig {
    /// Wraps a property; `{expression}` is the property text.
    pub template: String,
    /// Matches an evaluation error naming an unbound variable (first capture group).
    pub free_variable_pattern: Option<String>,
    /// Closes a property over `{variables}` (space separated).
    pub lambda_template: String,
}

impl PropertyConfig {
    pub fn free_variable_regex(&self) -> Result<Option<Regex>, ConfigError> {
        self.free_variable_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|source| ConfigError::Pattern {
                field: "properties.free_variable_pattern",
                source,
            })
    }
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            template: "Test.QuickCheck.quickCheck ({expression})".to_string(),
            free_variable_pattern: Some(r"Variable not in scope: ([a-z_][\w']*)".to_string()),
            lambda_template: "\\{variables} -> {expression}".to_string(),
        }
    }
}

/// Which comparator runs, and the interpreter-side functions it may call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    pub strategy: ComparisonStrategy,
    /// Applied to the expected text; `{text}` is its quoted literal.
    pub clean_expected: Option<String>,
    /// Applied to the actual output; `{text}` is its quoted literal.
    pub clean_actual: Option<String>,
    /// Predicate over `{actual}` and `{expected}` printing a boolean.
    pub equals: Option<String>,
}
