//! Package enumeration via the Go toolchain.
//!
//! Discovery mirrors `go list`'s own notion of a package instead of walking
//! the filesystem, which keeps vendored and generated subtrees out of the
//! result. The scanner runs `go env GOMOD` to confirm a module root, then
//! `go list ./...` in the target root, and maps each reported import path
//! back to a directory under the root.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::warn;

use crate::error::{DiscoveryError, Result};
use crate::package::Package;

/// Result of one discovery run.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub packages: Vec<Package>,
    pub package_dirs: Vec<PathBuf>,
}

/// Enumerate the Go packages under `root`.
///
/// Toolchain failures (spawn error or non-zero exit) are fatal. An import
/// path that cannot be resolved against the root is skipped with a
/// warning; a package directory with no `.go` files yields an empty file
/// list with a warning.
pub async fn scan(root: &Path) -> Result<ScanOutput> {
    let root = expand_home(root);

    run_go(&root, &["env", "GOMOD"]).await?;
    let stdout = run_go(&root, &["list", "./..."]).await?;

    let mut packages = Vec::new();
    let mut package_dirs = Vec::new();

    for import_path in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(dir) = resolve_package_dir(import_path, &root) else {
            warn!("No directory found for package: {}", import_path);
            continue;
        };

        let files = list_go_files(&dir)?;
        if files.is_empty() {
            warn!("No Go file found in {}", dir.display());
        }

        package_dirs.push(dir.clone());
        packages.push(Package::new(import_path, dir, files));
    }

    Ok(ScanOutput {
        packages,
        package_dirs,
    })
}

/// Drop packages living under any of the excluded paths.
///
/// Excludes are resolved against the root when relative; matching is by
/// path prefix, applied before classification.
pub fn apply_excludes(packages: Vec<Package>, excludes: &[String], root: &Path) -> Vec<Package> {
    if excludes.is_empty() {
        return packages;
    }

    let root = expand_home(root);
    let prefixes: Vec<PathBuf> = excludes
        .iter()
        .map(|e| {
            let path = Path::new(e);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            }
        })
        .collect();

    packages
        .into_iter()
        .filter(|package| {
            let excluded = prefixes.iter().any(|p| package.dir_path.starts_with(p));
            if excluded {
                warn!("Excluding package {}", package.name);
            }
            !excluded
        })
        .collect()
}

/// Map a `go list` import path to a directory under the scanned root.
///
/// The root's final path segment is located inside the import path; the
/// remainder names the subdirectory. An import path ending exactly at the
/// base segment is the module root package.
pub fn resolve_package_dir(import_path: &str, root: &Path) -> Option<PathBuf> {
    let base = root.file_name()?.to_str()?;

    let marker = format!("/{}/", base);
    if let Some(index) = import_path.find(&marker) {
        let rest = &import_path[index + marker.len()..];
        return Some(root.join(rest));
    }

    if import_path == base || import_path.ends_with(&format!("/{}", base)) {
        return Some(root.to_path_buf());
    }

    None
}

/// Immediate `.go` files in a directory, sorted for determinism.
fn list_go_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_go = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "go");
        if path.is_file() && is_go {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };

    if let Some(rest) = text.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }

    path.to_path_buf()
}

async fn run_go(root: &Path, args: &[&str]) -> Result<String> {
    let command = format!("go {}", args.join(" "));

    let output = Command::new("go")
        .args(args)
        .current_dir(root)
        .output()
        .await
        .map_err(|source| DiscoveryError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(DiscoveryError::Toolchain {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
