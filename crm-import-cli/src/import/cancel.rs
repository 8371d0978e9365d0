//! Cooperative cancellation
//!
//! A termination signal sets a process-wide flag; the runner polls it
//! between records. Nothing here terminates the process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-writer cancellation flag
///
/// Set once by the signal watcher, read by the runner between records.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Set the flag on the first SIGINT or SIGTERM
///
/// The watcher prints one notice and exits; the run keeps going until the
/// runner observes the flag at the next record boundary.
pub fn spawn_signal_watcher(flag: CancelFlag) {
    tokio::spawn(async move {
        wait_for_termination().await;
        println!("\nInterrupt received, finishing the current record before stopping...");
        log::info!("termination signal received, cancellation requested");
        flag.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(err) => {
            log::warn!("failed to install SIGTERM handler: {err}");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    let _ = tokio::signal::ctrl_c().await;
}
