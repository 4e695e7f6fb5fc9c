//! Run statistics and the three-way outcome every checked item collapses to.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::Serialize;

/// Counters for a run. Combines pointwise; `Summary::default()` is the identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Summary {
    /// Statically known number of examples.
    pub examples: usize,
    pub tried: usize,
    pub errors: usize,
    pub failures: usize,
}

impl Summary {
    pub const fn new(examples: usize, tried: usize, errors: usize, failures: usize) -> Self {
        Self {
            examples,
            tried,
            errors,
            failures,
        }
    }

    /// A summary seeded with the total example count and nothing tried yet.
    pub const fn with_examples(examples: usize) -> Self {
        Self::new(examples, 0, 0, 0)
    }

    pub fn successes(&self) -> usize {
        self.tried
            .saturating_sub(self.errors)
            .saturating_sub(self.failures)
    }

    /// Errors plus failures.
    pub fn problems(&self) -> usize {
        self.errors + self.failures
    }

    pub fn is_success(&self) -> bool {
        self.problems() == 0
    }
}

impl Add for Summary {
    type Output = Summary;

    fn add(self, other: Summary) -> Summary {
        Summary {
            examples: self.examples + other.examples,
            tried: self.tried + other.tried,
            errors: self.errors + other.errors,
            failures: self.failures + other.failures,
        }
    }
}

impl AddAssign for Summary {
    fn add_assign(&mut self, other: Summary) {
        *self = *self + other;
    }
}

impl Sum for Summary {
    fn sum<I: Iterator<Item = Summary>>(iter: I) -> Summary {
        iter.fold(Summary::default(), Add::add)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Examples: {}  Tried: {}  Errors: {}  Failures: {}",
            self.examples, self.tried, self.errors, self.failures
        )
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// The result of checking one interaction or property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The item ran but disagreed with its expectation.
    Failure(String),
    /// The item (or the machinery checking it) could not be evaluated.
    Error(String),
}

impl Outcome {
    /// The summary increment this outcome contributes.
    pub const fn delta(&self) -> Summary {
        match self {
            Outcome::Success => Summary::new(0, 1, 0, 0),
            Outcome::Failure(_) => Summary::new(0, 1, 0, 1),
            Outcome::Error(_) => Summary::new(0, 1, 1, 0),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}
