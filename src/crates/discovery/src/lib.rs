//! Go package discovery and classification for gotestai.
//!
//! Wraps the Go toolchain to enumerate the packages under a root path,
//! resolves each import path back to a directory, lists its source files,
//! and partitions the result by existing test coverage.

pub mod classifier;
pub mod error;
pub mod package;
pub mod scanner;

// Re-export commonly used types
pub use classifier::{classify, Classification};
pub use error::{DiscoveryError, Result};
pub use package::{is_test_file, Package, TEST_FILE_SUFFIX};
pub use scanner::{apply_excludes, resolve_package_dir, scan, ScanOutput};
