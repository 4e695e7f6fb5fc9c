//! Loading already-extracted modules from manifest files.
//!
//! A manifest is YAML (JSON works too) of the form
//!
//! ```yaml
//! modules:
//!   - name: Data.Stack
//!     path: src/Data/Stack.hs
//!     setup:
//!       - example:
//!           - { expression: "import Data.Char", expected: [], line: 5 }
//!     groups:
//!       - - line: 12
//!           example:
//!             - expression: push 1 empty
//!               expected: "Stack [1]"
//!         - line: 20
//!           property: "reverse (reverse xs) == xs"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::errors::ManifestError;
use crate::model::{Interaction, Located, Location, Module, TestItem};

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    modules: Vec<ManifestModule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestModule {
    name: String,
    path: Option<String>,
    setup: Option<Vec<ManifestItem>>,
    #[serde(default)]
    groups: Vec<Vec<ManifestItem>>,
}

#[derive(Debug, Deserialize)]
struct ManifestItem {
    line: Option<usize>,
    #[serde(flatten)]
    kind: ManifestKind,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ManifestKind {
    Example(Vec<ManifestInteraction>),
    Property(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestInteraction {
    expression: String,
    #[serde(default)]
    expected: Expected,
    line: Option<usize>,
}

/// Expected output, as a list of lines or a single block of text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Expected {
    Lines(Vec<String>),
    Text(String),
}

impl Default for Expected {
    fn default() -> Self {
        Expected::Lines(Vec::new())
    }
}

impl Expected {
    fn into_lines(self) -> Vec<String> {
        match self {
            Expected::Lines(lines) => lines,
            Expected::Text(text) => text.lines().map(str::to_string).collect(),
        }
    }
}

// ============================================================================
// CONVERSION
// ============================================================================

impl ManifestModule {
    fn into_module(self) -> Module {
        let file = self.path.unwrap_or_else(|| self.name.clone());
        let locate = |line: Option<usize>| match line {
            Some(line) => Location::source(file.as_str(), line),
            None => Location::unhelpful(format!("<{}>", self.name)),
        };
        let convert = |items: Vec<ManifestItem>| -> Vec<TestItem> {
            items.into_iter().map(|item| item.into_test_item(&locate)).collect()
        };
        Module {
            name: self.name.clone(),
            setup: self.setup.map(&convert),
            groups: self.groups.into_iter().map(&convert).collect(),
        }
    }
}

impl ManifestItem {
    fn into_test_item(self, locate: &impl Fn(Option<usize>) -> Location) -> TestItem {
        match self.kind {
            ManifestKind::Property(expression) => TestItem::Property(Located::new(locate(self.line), expression)),
            ManifestKind::Example(interactions) => TestItem::Example(
                interactions
                    .into_iter()
                    .map(|i| {
                        Located::new(
                            locate(i.line.or(self.line)),
                            Interaction {
                                expression: i.expression,
                                expected: i.expected.into_lines(),
                            },
                        )
                    })
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses a manifest document.
pub fn parse_manifest(text: &str, path: &Path) -> Result<Vec<Module>, ManifestError> {
    let file: ManifestFile = serde_yaml::from_str(text).map_err(|source| ManifestError::Syntax {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.modules.into_iter().map(ManifestModule::into_module).collect())
}

/// Reads and parses one manifest file.
pub fn load_manifest(path: &Path) -> Result<Vec<Module>, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&text, path)
}

/// Finds manifest files under `root`, sorted. A file path is returned as-is.
pub fn discover_manifests(root: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| ManifestError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        let is_manifest = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .map(|ext| ext == "yaml" || ext == "yml" || ext == "json")
                .unwrap_or(false);
        if is_manifest {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Loads every manifest reachable from `roots`, keeping their order.
pub fn load_all(roots: &[PathBuf]) -> Result<Vec<Module>, ManifestError> {
    let mut modules = Vec::new();
    for root in roots {
        for path in discover_manifests(root)? {
            tracing::debug!(path = %path.display(), "loading manifest");
            modules.extend(load_manifest(&path)?);
        }
    }
    Ok(modules)
}
