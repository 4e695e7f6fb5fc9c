//! # Exemplar Test Support
//!
//! A scripted in-memory interpreter and helpers for building modules by hand.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use exemplar::errors::{EvalError, SessionError};
use exemplar::model::{Interaction, Located, Location, Module, TestItem};
use exemplar::property::PropertyChecker;
use exemplar::report::Reporter;
use exemplar::summary::Outcome;
use exemplar::Interpreter;
use termcolor::NoColor;

/// Session events, in the order the runner caused them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Reload,
    Evaluate(String),
}

/// Answers expressions from a table and records every request.
#[derive(Debug, Default)]
pub struct Scripted {
    answers: HashMap<String, Result<String, String>>,
    /// Reload fails once this many reloads have succeeded.
    reload_limit: Option<usize>,
    successful_reloads: usize,
    /// Expressions that answer once and error on every later evaluation.
    flaky: HashSet<String>,
    seen: HashSet<String>,
    /// Expressions that only answer after a binding was established.
    needs: HashMap<String, String>,
    bound: HashSet<String>,
    pub events: Vec<Event>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, expression: &str, output: &str) -> Self {
        self.answers.insert(expression.to_string(), Ok(output.to_string()));
        self
    }

    pub fn fail(mut self, expression: &str, message: &str) -> Self {
        self.answers.insert(expression.to_string(), Err(message.to_string()));
        self
    }

    /// `expression` errors unless `binding` was evaluated since the last reload.
    pub fn requires(mut self, expression: &str, binding: &str) -> Self {
        self.needs.insert(expression.to_string(), binding.to_string());
        self
    }

    /// `expression` answers the first time and errors afterwards.
    pub fn flaky(mut self, expression: &str) -> Self {
        self.flaky.insert(expression.to_string());
        self
    }

    pub fn reload_fails_after(mut self, successes: usize) -> Self {
        self.reload_limit = Some(successes);
        self
    }

    pub fn reloads(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Reload).count()
    }

    pub fn evaluated(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Evaluate(expression) => Some(expression.as_str()),
                Event::Reload => None,
            })
            .collect()
    }
}

impl Interpreter for Scripted {
    fn reload(&mut self) -> Result<(), SessionError> {
        self.events.push(Event::Reload);
        if self.reload_limit.is_some_and(|limit| self.successful_reloads >= limit) {
            return Err(SessionError::Reload {
                output: "src/Broken.hs:3:1: error: parse error".to_string(),
            });
        }
        self.successful_reloads += 1;
        self.bound.clear();
        Ok(())
    }

    fn evaluate(&mut self, expression: &str) -> Result<String, EvalError> {
        self.events.push(Event::Evaluate(expression.to_string()));
        if let Some(binding) = self.needs.get(expression) {
            if !self.bound.contains(binding) {
                return Err(EvalError::new(format!("Variable not in scope: {}", binding)));
            }
        }
        let repeated = !self.seen.insert(expression.to_string());
        if repeated && self.flaky.contains(expression) {
            return Err(EvalError::new(format!("flaky: {}", expression)));
        }
        self.bound.insert(expression.to_string());
        match self.answers.get(expression) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(EvalError::new(message.clone())),
            None => Ok(String::new()),
        }
    }
}

/// Evaluates the property text and treats "True" as success.
#[derive(Debug, Default)]
pub struct BoolProperties;

impl PropertyChecker for BoolProperties {
    fn check(&mut self, interpreter: &mut dyn Interpreter, expression: &str) -> Outcome {
        match interpreter.evaluate(expression) {
            Ok(output) if output.trim() == "True" => Outcome::Success,
            Ok(output) => Outcome::Failure(format!("property returned {}", output.trim())),
            Err(e) => Outcome::Error(e.message),
        }
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

pub fn at(line: usize) -> Location {
    Location::source("src/Stack.hs", line)
}

pub fn interaction(line: usize, expression: &str, expected: &[&str]) -> Located<Interaction> {
    Located::new(at(line), Interaction::new(expression, expected.iter().copied()))
}

pub fn example(interactions: Vec<Located<Interaction>>) -> TestItem {
    TestItem::Example(interactions)
}

pub fn property(line: usize, expression: &str) -> TestItem {
    TestItem::Property(Located::new(at(line), expression.to_string()))
}

/// A non-interactive reporter capturing plain text.
pub fn captured() -> Reporter<NoColor<Vec<u8>>> {
    Reporter::new(NoColor::new(Vec::new()), false)
}

pub fn text(reporter: Reporter<NoColor<Vec<u8>>>) -> String {
    String::from_utf8(reporter.into_inner().into_inner()).unwrap()
}

pub fn module(name: &str) -> Module {
    Module::new(name)
}
