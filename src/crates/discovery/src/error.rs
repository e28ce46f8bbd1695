//! Error types for package discovery.

use thiserror::Error;

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors that can occur while enumerating packages.
///
/// Toolchain failures are fatal to the whole run; everything recoverable
/// (unresolvable package paths, empty directories) is logged as a warning
/// inside the scanner instead of surfacing here.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The Go toolchain could not be spawned.
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The Go toolchain exited with a non-zero status.
    #[error("Command {command} failed: {stderr}")]
    Toolchain { command: String, stderr: String },

    /// Filesystem error while listing package directories.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
