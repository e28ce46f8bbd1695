//! CLI command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use llm::{Gateway, Provider};

use crate::error::{AppError, Result};
use crate::orchestrator::{Orchestrator, RunOptions, TaskOutcome};
use crate::settings::{ConfigStore, Settings};
use crate::shutdown::ShutdownCoordinator;

/// `gotestai generate <path>`: run the full pipeline.
pub async fn generate(
    path: PathBuf,
    exclude: Option<String>,
    provider_flag: Option<String>,
    concurrency: Option<usize>,
) -> Result<()> {
    let store = ConfigStore::default_location()?;
    let settings = Settings::load(&store)?;

    let provider = match provider_flag {
        Some(name) => name.parse::<Provider>()?,
        None => settings.provider,
    };

    let excludes: Vec<String> = exclude
        .map(|e| {
            e.split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let gateway = Arc::new(Gateway::for_provider(
        provider,
        settings.api_key_for(provider),
        settings.model.as_deref(),
    )?);

    let options = RunOptions {
        max_concurrent: concurrency.unwrap_or(settings.max_concurrent),
        model_settings: settings.model_settings(),
        skip_if_tests_exist: settings.skip_if_tests_exist,
    };

    let shutdown = ShutdownCoordinator::new();
    let signal_task = shutdown.install_signal_handlers();

    let orchestrator = Orchestrator::new(gateway, options).with_shutdown(shutdown);
    let summary = orchestrator.run(&path, &excludes).await?;

    signal_task.abort();

    if summary.with_tests > 0 {
        println!(
            "{}",
            format!("Found {} packages with test files.", summary.with_tests).green()
        );
    }
    if summary.without_tests > 0 {
        println!(
            "{}",
            format!("Found {} packages without test files.", summary.without_tests).green()
        );
    }

    for outcome in &summary.outcomes {
        match &outcome.outcome {
            TaskOutcome::Written(path) => {
                println!("{}", format!("Created {}", path.display()).blue());
            }
            TaskOutcome::Skipped(reason) => {
                println!(
                    "{}",
                    format!("Skipped {}: {}", outcome.package, reason).yellow()
                );
            }
            TaskOutcome::Failed(reason) => {
                println!(
                    "{}",
                    format!("Failed {}: {}", outcome.package, reason).red()
                );
            }
            TaskOutcome::Conflict(path) => {
                println!(
                    "{}",
                    format!(
                        "Conflict {}: target {} already produced by another package",
                        outcome.package,
                        path.display()
                    )
                    .red()
                );
            }
        }
    }

    Ok(())
}

/// `gotestai config set`: store an API key for a provider.
pub async fn config_set(provider: String, api_key: String) -> Result<()> {
    let provider = provider
        .parse::<Provider>()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let store = ConfigStore::default_location()?;
    store.set(&[(provider.api_key_var().to_string(), api_key)])?;

    println!(
        "{}",
        format!(
            "Saved {} key to {}",
            provider,
            store.path().display()
        )
        .green()
    );
    Ok(())
}
