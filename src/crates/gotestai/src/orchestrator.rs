//! Pipeline orchestration: scan, classify, fan out, await every task.
//!
//! Discovery and classification run synchronously on the control task;
//! per-package generation work is the only suspension-bearing part and is
//! dispatched into a `JoinSet` behind a semaphore, so in-flight provider
//! calls stay bounded and the run only completes once every dispatched
//! task has reached a terminal state.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use discovery::{apply_excludes, classify, scan, Package};
use llm::{ErrorPolicy, Gateway, GenerateRequest, GeneratedObject, ModelSettings, ResponseSchema};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::shutdown::ShutdownCoordinator;
use crate::{prompt, writer};

/// Run-level options, fixed before dispatch.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Cap on simultaneous in-flight provider calls.
    pub max_concurrent: usize,
    /// Sampling/budget settings applied to every generation call.
    pub model_settings: ModelSettings,
    /// Whether packages with existing tests are skipped. `false` is an
    /// unimplemented configuration and fails fast.
    pub skip_if_tests_exist: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            model_settings: ModelSettings::default(),
            skip_if_tests_exist: true,
        }
    }
}

/// Terminal state of one package task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Generated test file written to this path.
    Written(PathBuf),
    /// Task never ran or produced nothing actionable.
    Skipped(String),
    /// Task failed; the failure stays isolated to this package.
    Failed(String),
    /// Another package already claimed the same target path.
    Conflict(PathBuf),
}

/// Terminal state of one package, by import path.
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    pub package: String,
    pub outcome: TaskOutcome,
}

/// Aggregate result of a run. Partial success is expected.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub with_tests: usize,
    pub without_tests: usize,
    pub outcomes: Vec<PackageOutcome>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Written(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Failed(_)))
    }

    pub fn conflicts(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Conflict(_)))
    }

    pub fn written_paths(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.outcome {
                TaskOutcome::Written(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&TaskOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|o| predicate(&o.outcome))
            .count()
    }
}

/// Drives the generation pipeline for one root path.
pub struct Orchestrator {
    gateway: Arc<Gateway>,
    options: RunOptions,
    shutdown: ShutdownCoordinator,
}

impl Orchestrator {
    pub fn new(gateway: Arc<Gateway>, options: RunOptions) -> Self {
        Self {
            gateway,
            options,
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Use an externally owned shutdown coordinator (the binary installs
    /// signal handlers on it).
    pub fn with_shutdown(mut self, shutdown: ShutdownCoordinator) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Full pipeline: scan, filter excludes, classify, dispatch.
    ///
    /// Discovery failure aborts before any task is dispatched. Per-package
    /// failures land in the summary instead.
    pub async fn run(&self, root: &Path, excludes: &[String]) -> Result<RunSummary> {
        let scan_output = scan(root).await?;
        let packages = apply_excludes(scan_output.packages, excludes, root);
        let classification = classify(packages);

        if !classification.with_tests.is_empty() {
            info!(
                "Found {} packages with test files",
                classification.with_tests.len()
            );
        }
        if !classification.without_tests.is_empty() {
            info!(
                "Found {} packages without test files",
                classification.without_tests.len()
            );
        }

        if !self.options.skip_if_tests_exist {
            return Err(AppError::NotImplemented(
                "regenerating tests for packages that already have them".to_string(),
            ));
        }

        let mut summary = self.dispatch(classification.without_tests).await;
        summary.with_tests = classification.with_tests.len();
        Ok(summary)
    }

    /// Fan out one task per package and wait for all of them.
    pub async fn dispatch(&self, packages: Vec<Package>) -> RunSummary {
        let mut summary = RunSummary {
            without_tests: packages.len(),
            ..RunSummary::default()
        };

        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent.max(1)));
        let claimed: Arc<Mutex<HashSet<PathBuf>>> = Arc::new(Mutex::new(HashSet::new()));
        let mut tasks = JoinSet::new();

        for package in packages {
            if self.shutdown.is_shutdown_requested() {
                summary.outcomes.push(PackageOutcome {
                    package: package.name,
                    outcome: TaskOutcome::Skipped("shutdown requested".to_string()),
                });
                continue;
            }

            let gateway = Arc::clone(&self.gateway);
            let semaphore = Arc::clone(&semaphore);
            let claimed = Arc::clone(&claimed);
            let settings = self.options.model_settings.clone();
            let shutdown = self.shutdown.clone();

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return PackageOutcome {
                            package: package.name,
                            outcome: TaskOutcome::Skipped("scheduler closed".to_string()),
                        }
                    }
                };

                if shutdown.is_shutdown_requested() {
                    return PackageOutcome {
                        package: package.name,
                        outcome: TaskOutcome::Skipped("shutdown requested".to_string()),
                    };
                }

                process_package(gateway, settings, package, claimed).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => summary.outcomes.push(outcome),
                Err(e) => {
                    warn!("Package task panicked: {}", e);
                    summary.outcomes.push(PackageOutcome {
                        package: "<unknown>".to_string(),
                        outcome: TaskOutcome::Failed(format!("task panicked: {}", e)),
                    });
                }
            }
        }

        summary
    }
}

/// One package's journey: prompt, invoke, write.
async fn process_package(
    gateway: Arc<Gateway>,
    settings: ModelSettings,
    package: Package,
    claimed: Arc<Mutex<HashSet<PathBuf>>>,
) -> PackageOutcome {
    let name = package.name.clone();
    let outcome = run_package(gateway, settings, package, claimed).await;
    PackageOutcome {
        package: name,
        outcome,
    }
}

async fn run_package(
    gateway: Arc<Gateway>,
    settings: ModelSettings,
    package: Package,
    claimed: Arc<Mutex<HashSet<PathBuf>>>,
) -> TaskOutcome {
    if package.files.is_empty() {
        return TaskOutcome::Skipped("no source files".to_string());
    }

    let prompt = match prompt::build(&package.files, None::<&[PathBuf]>) {
        Ok(prompt) => prompt,
        Err(e) => return TaskOutcome::Failed(format!("prompt build failed: {}", e)),
    };

    let request = GenerateRequest::new(prompt, ResponseSchema::TestFile, settings);
    // Skip policy: one backend hiccup must not abort the batch.
    let generated = match gateway.invoke(request, ErrorPolicy::Skip).await {
        Ok(Some(GeneratedObject::TestFile(file))) => file,
        Ok(Some(other)) => {
            return TaskOutcome::Failed(format!("unexpected response shape: {:?}", other))
        }
        Ok(None) => return TaskOutcome::Failed("generation failed, skipped".to_string()),
        Err(e) => return TaskOutcome::Failed(e.to_string()),
    };

    let target = PathBuf::from(&generated.file_name);
    {
        let mut claimed = claimed.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !claimed.insert(target.clone()) {
            warn!(
                "Target {} already claimed by another package",
                target.display()
            );
            return TaskOutcome::Conflict(target);
        }
    }

    match writer::write(&generated).await {
        Ok(path) => TaskOutcome::Written(path),
        Err(e) => TaskOutcome::Failed(format!("write failed: {}", e)),
    }
}
