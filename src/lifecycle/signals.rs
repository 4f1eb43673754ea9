//! OS signal handling.
//!
//! # Responsibilities
//! - SIGINT (Ctrl+C) and SIGTERM trigger graceful shutdown
//! - SIGHUP rescans the source directory, for sources whose change events
//!   were missed
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers a resync, not shutdown

use std::path::PathBuf;

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;
use crate::source::{loader, pump};
use crate::store::Store;

/// Trigger `shutdown` on the first SIGINT or SIGTERM.
pub fn spawn_shutdown_listener(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        terminate_signal().await;
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    })
}

#[cfg(unix)]
async fn terminate_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGTERM handler, waiting for Ctrl+C only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Rescan `config_dir` into `store` on every SIGHUP until shutdown.
#[cfg(unix)]
pub fn spawn_resync_on_hangup(store: Store, config_dir: PathBuf, shutdown: Shutdown) -> JoinHandle<()> {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGHUP handler, resync disabled");
                return;
            }
        };
        let mut stop = shutdown.subscribe();

        loop {
            tokio::select! {
                _ = hangup.recv() => {
                    tracing::info!(dir = ?config_dir, "SIGHUP received, rescanning config sources");
                    resync(&store, &config_dir);
                }
                _ = stop.recv() => break,
            }
        }
    })
}

#[cfg(not(unix))]
pub fn spawn_resync_on_hangup(_store: Store, _config_dir: PathBuf, _shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async {})
}

/// Reapply every source file in `config_dir`.
pub fn resync(store: &Store, config_dir: &std::path::Path) {
    match loader::scan_dir(config_dir) {
        Ok(events) => {
            let applied = pump::apply_all(store, &events);
            tracing::info!(found = events.len(), applied, "Config sources rescanned");
        }
        Err(e) => tracing::error!(error = %e, "Failed to rescan config sources"),
    }
}
