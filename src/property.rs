//! Property checks.
//!
//! The engine only needs a three-way [`Outcome`] per property. The default
//! checker hands the property to a QuickCheck-style driver inside the
//! interpreter and classifies what it prints.

use regex::Regex;

use crate::compare::parse_bool;
use crate::config::PropertyConfig;
use crate::errors::ConfigError;
use crate::interpreter::Interpreter;
use crate::summary::Outcome;
use crate::template::render;

pub trait PropertyChecker {
    fn check(&mut self, interpreter: &mut dyn Interpreter, expression: &str) -> Outcome;
}

/// Runs properties through an interpreter-side QuickCheck driver.
#[derive(Debug, Clone)]
pub struct QuickCheckProperties {
    template: String,
    free_variables: Option<Regex>,
    lambda_template: String,
}

impl QuickCheckProperties {
    pub fn from_config(config: &PropertyConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            template: config.template.clone(),
            free_variables: config.free_variable_regex()?,
            lambda_template: config.lambda_template.clone(),
        })
    }

    fn run(&self, interpreter: &mut dyn Interpreter, property: &str) -> Result<String, String> {
        let expression = render(&self.template, &[("expression", property)]);
        interpreter.evaluate(&expression).map_err(|e| e.message)
    }

    /// Names reported as unbound in `message`, deduplicated in order.
    fn unbound_variables(&self, message: &str) -> Vec<String> {
        let Some(pattern) = &self.free_variables else {
            return Vec::new();
        };
        let mut names: Vec<String> = Vec::new();
        for caps in pattern.captures_iter(message) {
            if let Some(name) = caps.get(1) {
                if !names.iter().any(|n| n == name.as_str()) {
                    names.push(name.as_str().to_string());
                }
            }
        }
        names
    }
}

impl PropertyChecker for QuickCheckProperties {
    fn check(&mut self, interpreter: &mut dyn Interpreter, expression: &str) -> Outcome {
        let output = match self.run(interpreter, expression) {
            Ok(output) => output,
            Err(message) => {
                let variables = self.unbound_variables(&message);
                if variables.is_empty() {
                    return Outcome::Error(message);
                }
                tracing::debug!(?variables, "closing property over unbound variables");
                let variables = variables.join(" ");
                let closed = render(
                    &self.lambda_template,
                    &[("variables", variables.as_str()), ("expression", expression)],
                );
                match self.run(interpreter, &closed) {
                    Ok(output) => output,
                    Err(message) => return Outcome::Error(message),
                }
            }
        };
        classify(&output)
    }
}

/// Classifies the driver's output.
pub fn classify(output: &str) -> Outcome {
    let trimmed = output.trim();
    if trimmed.starts_with("+++ OK") {
        return Outcome::Success;
    }
    if trimmed.starts_with("*** Failed!") || trimmed.starts_with("*** Gave up!") {
        return Outcome::Failure(trimmed.to_string());
    }
    match parse_bool(trimmed) {
        Some(true) => Outcome::Success,
        Some(false) => Outcome::Failure("property evaluated to False".to_string()),
        None => Outcome::Error(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::{EvalError, SessionError};

    #[derive(Default)]
    struct Table(HashMap<String, Result<String, String>>);

    impl Table {
        fn ok(mut self, expression: &str, output: &str) -> Self {
            self.0.insert(expression.to_string(), Ok(output.to_string()));
            self
        }

        fn err(mut self, expression: &str, message: &str) -> Self {
            self.0.insert(expression.to_string(), Err(message.to_string()));
            self
        }
    }

    impl Interpreter for Table {
        fn reload(&mut self) -> Result<(), SessionError> {
            Ok(())
        }

        fn evaluate(&mut self, expression: &str) -> Result<String, EvalError> {
            match self.0.get(expression) {
                Some(Ok(output)) => Ok(output.clone()),
                Some(Err(message)) => Err(EvalError::new(message.clone())),
                None => Err(EvalError::new(format!("unexpected: {}", expression))),
            }
        }
    }

    fn checker() -> QuickCheckProperties {
        QuickCheckProperties::from_config(&PropertyConfig {
            template: "qc ({expression})".to_string(),
            ..PropertyConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn classifies_driver_output() {
        assert_eq!(classify("+++ OK, passed 100 tests.\n"), Outcome::Success);
        assert_eq!(
            classify("*** Failed! Falsified (after 3 tests):\n[1,0]"),
            Outcome::Failure("*** Failed! Falsified (after 3 tests):\n[1,0]".to_string())
        );
        assert!(matches!(classify("*** Gave up! Passed only 12 tests."), Outcome::Failure(_)));
        assert_eq!(classify("True"), Outcome::Success);
        assert!(matches!(classify("False"), Outcome::Failure(_)));
        assert_eq!(classify("()"), Outcome::Error("()".to_string()));
    }

    #[test]
    fn passes_property_through_template() {
        let mut table = Table::default().ok("qc (1 + 1 == 2)", "+++ OK, passed 1 test.");
        assert_eq!(checker().check(&mut table, "1 + 1 == 2"), Outcome::Success);
    }

    #[test]
    fn closes_over_unbound_variables() {
        let mut table = Table::default()
            .err(
                "qc (reverse (reverse xs) == xs)",
                "<interactive>:1:18: error:\n    Variable not in scope: xs\n<interactive>:1:24: error:\n    Variable not in scope: xs",
            )
            .ok("qc (\\xs -> reverse (reverse xs) == xs)", "+++ OK, passed 100 tests.");
        assert_eq!(checker().check(&mut table, "reverse (reverse xs) == xs"), Outcome::Success);
    }

    #[test]
    fn other_evaluation_errors_are_errors() {
        let mut table = Table::default().err("qc (foo)", "*** Exception: boom");
        assert_eq!(
            checker().check(&mut table, "foo"),
            Outcome::Error("*** Exception: boom".to_string())
        );
    }
}
