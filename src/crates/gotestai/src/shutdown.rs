//! Graceful shutdown coordination.
//!
//! The orchestrator polls the coordinator before dispatching each package
//! task; once a signal arrives, queued work is skipped and in-flight tasks
//! drain to a terminal state instead of being orphaned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;

/// Shared flag flipped by a shutdown signal.
#[derive(Clone, Debug, Default)]
pub struct ShutdownCoordinator {
    requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark shutdown as requested. Idempotent.
    pub fn request_shutdown(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            warn!("Shutdown requested, draining in-flight tasks");
        }
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Listen for SIGINT/SIGTERM (Ctrl+C elsewhere) in a background task.
    pub fn install_signal_handlers(&self) -> tokio::task::JoinHandle<()> {
        let coordinator = self.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{signal, SignalKind};

                let mut sigint = match signal(SignalKind::interrupt()) {
                    Ok(s) => s,
                    Err(e) => {
                        warn!("Failed to install SIGINT handler: {}", e);
                        return;
                    }
                };
                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(e) => {
                        warn!("Failed to install SIGTERM handler: {}", e);
                        return;
                    }
                };

                tokio::select! {
                    _ = sigint.recv() => coordinator.request_shutdown(),
                    _ = sigterm.recv() => coordinator.request_shutdown(),
                }
            }

            #[cfg(not(unix))]
            {
                if tokio::signal::ctrl_c().await.is_ok() {
                    coordinator.request_shutdown();
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clear() {
        let coordinator = ShutdownCoordinator::new();
        assert!(!coordinator.is_shutdown_requested());
    }

    #[test]
    fn test_request_is_idempotent() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.request_shutdown();
        coordinator.request_shutdown();
        assert!(coordinator.is_shutdown_requested());
    }

    #[test]
    fn test_clones_share_state() {
        let coordinator = ShutdownCoordinator::new();
        let clone = coordinator.clone();

        coordinator.request_shutdown();
        assert!(clone.is_shutdown_requested());
    }
}
