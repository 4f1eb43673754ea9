//! Delivery of source events into the store.

use tokio::sync::mpsc;

use crate::lifecycle::ShutdownSignal;
use crate::source::SourceEvent;
use crate::store::{Store, UpdateOutcome};

/// Deliver a batch of events, e.g. the result of a directory scan.
/// Returns how many were applied.
pub fn apply_all(store: &Store, events: &[SourceEvent]) -> usize {
    events
        .iter()
        .filter(|event| {
            matches!(
                store.on_source_update(&event.domain, &event.block),
                UpdateOutcome::Applied { .. }
            )
        })
        .count()
}

/// Feed events into the store until the channel closes or shutdown fires.
pub async fn run(
    store: Store,
    mut events: mpsc::UnboundedReceiver<SourceEvent>,
    mut shutdown: ShutdownSignal,
) {
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::info!("Config source channel closed");
                    break;
                };
                store.on_source_update(&event.domain, &event.block);
            }
            _ = shutdown.recv() => {
                tracing::info!("Config source pump received shutdown signal, exiting loop");
                break;
            }
        }
    }
}
