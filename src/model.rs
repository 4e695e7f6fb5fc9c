//! The already-extracted test material the engine replays.
//!
//! Everything in this module is plain data: a [`Module`] owns an optional setup
//! group and a list of test groups, each group is an ordered list of
//! [`TestItem`]s, and every item knows its [`Location`].

use std::fmt;

// ============================================================================
// LOCATIONS
// ============================================================================

/// Where an example or property came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// A real position in a source file.
    Source { file: String, line: usize },
    /// A synthetic marker for material with no meaningful source position.
    Unhelpful(String),
}

impl Location {
    pub fn source(file: impl Into<String>, line: usize) -> Self {
        Location::Source {
            file: file.into(),
            line,
        }
    }

    pub fn unhelpful(label: impl Into<String>) -> Self {
        Location::Unhelpful(label.into())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Source { file, line } => write!(f, "{}:{}", file, line),
            Location::Unhelpful(label) => write!(f, "{}", label),
        }
    }
}

/// A value tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<T> {
    pub location: Location,
    pub value: T,
}

impl<T> Located<T> {
    pub fn new(location: Location, value: T) -> Self {
        Self { location, value }
    }
}

// ============================================================================
// TEST ITEMS
// ============================================================================

/// One request/response step of an interactive example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub expression: String,
    pub expected: Vec<String>,
}

impl Interaction {
    pub fn new<S: Into<String>>(expression: impl Into<String>, expected: impl IntoIterator<Item = S>) -> Self {
        Self {
            expression: expression.into(),
            expected: expected.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single testable unit of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestItem {
    /// A chain of interactions sharing session state; the first one that does
    /// not succeed aborts the rest of the chain.
    Example(Vec<Located<Interaction>>),
    /// An expression checked as a property.
    Property(Located<String>),
}

impl TestItem {
    /// Number of outcomes this item can contribute to the summary.
    pub fn example_count(&self) -> usize {
        match self {
            TestItem::Example(interactions) => interactions.len(),
            TestItem::Property(_) => 1,
        }
    }
}

/// An ordered group of items run after a single session reload.
pub type Group = Vec<TestItem>;

/// A named module: optional setup followed by its test groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Module {
    pub name: String,
    pub setup: Option<Group>,
    pub groups: Vec<Group>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: None,
            groups: Vec::new(),
        }
    }

    pub fn with_setup(mut self, setup: Group) -> Self {
        self.setup = Some(setup);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Statically known number of examples, setup included.
    pub fn example_count(&self) -> usize {
        self.setup
            .iter()
            .chain(self.groups.iter())
            .flatten()
            .map(TestItem::example_count)
            .sum()
    }
}

/// Total number of examples across all modules.
pub fn count_examples(modules: &[Module]) -> usize {
    modules.iter().map(Module::example_count).sum()
}
