//! gotestai: generate Go test files using generative AI.
//!
//! The pipeline discovers the Go packages under a root path, partitions
//! them by existing test coverage, renders one prompt per uncovered
//! package, submits it to a generative backend under an input token
//! budget, and writes the returned `_test.go` file where the backend says
//! it belongs. Per-package failures stay isolated; only configuration and
//! whole-run discovery errors abort the process.

pub mod cli;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod settings;
pub mod shutdown;
pub mod writer;

pub use error::{AppError, Result};
pub use orchestrator::{Orchestrator, PackageOutcome, RunOptions, RunSummary, TaskOutcome};
pub use settings::{ConfigStore, Settings};
pub use shutdown::ShutdownCoordinator;
