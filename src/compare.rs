//! Deciding whether an interaction's actual output matches its expectation.
//!
//! Two comparators exist. [`ComparisonStrategy::LineExact`] compares the output
//! lines verbatim. [`ComparisonStrategy::Delegated`] lets the interpreter clean
//! both sides and decide equality itself, so user-defined notions of equality
//! apply; without interpreter-side functions it falls back to comparing text
//! modulo trailing whitespace and blank lines.

use std::fmt::Write as _;

use difference::{Changeset, Difference};
use serde::Deserialize;

use crate::config::ComparisonConfig;
use crate::interpreter::Interpreter;
use crate::model::Interaction;
use crate::template::{quote, render};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonStrategy {
    LineExact,
    #[default]
    Delegated,
}

/// The verdict on an interaction that evaluated cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Match,
    /// Carries the rendered expected-vs-actual diagnostic.
    Mismatch(String),
}

/// An evaluation that failed, attributed to the expression that was sent.
///
/// For the delegated comparator this may be a cleanup or equality call rather
/// than the example's own expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributed {
    pub expression: String,
    pub message: String,
}

impl Attributed {
    fn new(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

/// A configured comparator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub strategy: ComparisonStrategy,
    pub clean_expected: Option<String>,
    pub clean_actual: Option<String>,
    pub equals: Option<String>,
}

impl Comparison {
    pub fn line_exact() -> Self {
        Self {
            strategy: ComparisonStrategy::LineExact,
            ..Self::default()
        }
    }

    pub fn delegated() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ComparisonConfig) -> Self {
        Self {
            strategy: config.strategy,
            clean_expected: config.clean_expected.clone(),
            clean_actual: config.clean_actual.clone(),
            equals: config.equals.clone(),
        }
    }

    /// Evaluates the interaction and compares its output.
    pub fn check<I: Interpreter + ?Sized>(
        &self,
        interpreter: &mut I,
        interaction: &Interaction,
    ) -> Result<Verdict, Attributed> {
        let actual = interpreter
            .evaluate(&interaction.expression)
            .map_err(|e| Attributed::new(&interaction.expression, e.message))?;
        match self.strategy {
            ComparisonStrategy::LineExact => Ok(compare_lines(&interaction.expected, &actual)),
            ComparisonStrategy::Delegated => self.compare_delegated(interpreter, &interaction.expected, &actual),
        }
    }

    fn compare_delegated<I: Interpreter + ?Sized>(
        &self,
        interpreter: &mut I,
        expected: &[String],
        actual: &str,
    ) -> Result<Verdict, Attributed> {
        let expected_raw = expected.join("\n");
        let expected_clean = clean(interpreter, self.clean_expected.as_deref(), &expected_raw)?;
        let actual_clean = clean(interpreter, self.clean_actual.as_deref(), actual)?;

        let equal = match self.equals.as_deref() {
            None => normalized_eq(&actual_clean, &expected_clean),
            Some(template) => {
                let actual_literal = quote(&actual_clean);
                let expected_literal = quote(&expected_clean);
                let expression = render(
                    template,
                    &[
                        ("actual", actual_literal.as_str()),
                        ("expected", expected_literal.as_str()),
                    ],
                );
                let output = interpreter
                    .evaluate(&expression)
                    .map_err(|e| Attributed::new(&expression, e.message))?;
                parse_bool(&output).ok_or_else(|| {
                    Attributed::new(
                        &expression,
                        format!("equality predicate printed {:?}, which is not a boolean", output.trim()),
                    )
                })?
            }
        };

        if equal {
            return Ok(Verdict::Match);
        }
        Ok(Verdict::Mismatch(self.render_delegated_mismatch(
            &expected_raw,
            actual,
            &expected_clean,
            &actual_clean,
        )))
    }

    fn render_delegated_mismatch(
        &self,
        expected_raw: &str,
        actual_raw: &str,
        expected_clean: &str,
        actual_clean: &str,
    ) -> String {
        let mut out = String::new();
        push_labeled(&mut out, "expected:", expected_raw);
        push_labeled(&mut out, " but got:", actual_raw);
        if expected_clean != expected_raw || actual_clean != actual_raw {
            push_labeled(&mut out, "expected (cleaned):", expected_clean);
            push_labeled(&mut out, " but got (cleaned):", actual_clean);
        }
        out.push_str("definition:\n");
        let _ = writeln!(
            out,
            "  expected' = {}",
            self.clean_expected.as_deref().unwrap_or("{text}")
        );
        let _ = writeln!(
            out,
            "  actual'   = {}",
            self.clean_actual.as_deref().unwrap_or("{text}")
        );
        let _ = writeln!(
            out,
            "  equal     = {}",
            self.equals.as_deref().unwrap_or(
                "trailing whitespace stripped, blank lines dropped, then compared as text"
            )
        );
        out
    }
}

/// Runs one optional cleanup template over `text`.
fn clean<I: Interpreter + ?Sized>(
    interpreter: &mut I,
    template: Option<&str>,
    text: &str,
) -> Result<String, Attributed> {
    let Some(template) = template else {
        return Ok(text.to_string());
    };
    let literal = quote(text);
    let expression = render(template, &[("text", literal.as_str())]);
    interpreter
        .evaluate(&expression)
        .map_err(|e| Attributed::new(expression, e.message))
}

// ============================================================================
// PURE COMPARISONS
// ============================================================================

/// Line-exact comparison of raw output against expected lines.
pub fn compare_lines(expected: &[String], actual: &str) -> Verdict {
    let actual_lines: Vec<&str> = actual.lines().collect();
    if actual_lines.len() == expected.len() && actual_lines.iter().zip(expected).all(|(a, e)| *a == e.as_str()) {
        return Verdict::Match;
    }
    Verdict::Mismatch(render_line_mismatch(&expected.join("\n"), actual))
}

/// Strips trailing whitespace from each line and drops blank lines.
pub fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The default delegated equality.
pub fn normalized_eq(actual: &str, expected: &str) -> bool {
    normalize(actual) == normalize(expected)
}

/// Reads a boolean printed by the interpreter.
pub fn parse_bool(output: &str) -> Option<bool> {
    match output.trim() {
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        _ => None,
    }
}

fn render_line_mismatch(expected: &str, actual: &str) -> String {
    let mut out = String::new();
    push_labeled(&mut out, "expected:", expected);
    push_labeled(&mut out, " but got:", actual);
    if expected.lines().count() > 1 || actual.lines().count() > 1 {
        out.push_str("diff:\n");
        let changeset = Changeset::new(expected, actual, "\n");
        for diff in &changeset.diffs {
            let (prefix, text) = match diff {
                Difference::Same(x) => (' ', x),
                Difference::Rem(x) => ('-', x),
                Difference::Add(x) => ('+', x),
            };
            for line in text.split('\n') {
                let _ = writeln!(out, "  {}{}", prefix, line);
            }
        }
    }
    out
}

/// `label` followed by `text`, continuation lines aligned under the first.
fn push_labeled(out: &mut String, label: &str, text: &str) {
    let indent = " ".repeat(label.len() + 1);
    let mut lines = text.split('\n');
    let _ = writeln!(out, "{} {}", label, lines.next().unwrap_or_default());
    for line in lines {
        let _ = writeln!(out, "{}{}", indent, line);
    }
}
