//! The package data model.

use std::path::{Path, PathBuf};

/// Suffix marking a Go test file.
pub const TEST_FILE_SUFFIX: &str = "_test.go";

/// One Go package: a directory of source files sharing a namespace, as
/// reported by the Go toolchain. Constructed once per discovery run and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Import path as reported by `go list`.
    pub name: String,
    /// Directory the package resolves to under the scanned root.
    pub dir_path: PathBuf,
    /// Immediate `.go` files in the package directory, sorted.
    pub files: Vec<PathBuf>,
}

impl Package {
    pub fn new(name: impl Into<String>, dir_path: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir_path: dir_path.into(),
            files,
        }
    }

    /// Whether any file follows the `*_test.go` naming convention.
    pub fn has_tests(&self) -> bool {
        self.files.iter().any(|f| is_test_file(f))
    }

    /// The test files belonging to this package.
    pub fn test_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|f| is_test_file(f))
            .cloned()
            .collect()
    }
}

/// Whether a path names a Go test file.
pub fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TEST_FILE_SUFFIX))
}
