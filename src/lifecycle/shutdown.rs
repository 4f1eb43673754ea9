//! Shutdown coordination for the controller.

use std::sync::Arc;

use tokio::sync::watch;

/// Graceful shutdown latch shared by the long-running tasks.
///
/// Once triggered it stays triggered, so a task that subscribes late still
/// sees it.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

/// One task's view of a [`Shutdown`].
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Future that resolves once shutdown is triggered, for
    /// `axum::serve(..).with_graceful_shutdown`.
    pub fn signalled(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut signal = self.subscribe();
        async move { signal.recv().await }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Wait until shutdown is triggered. Cancel-safe.
    pub async fn recv(&mut self) {
        // All senders gone means nobody can trigger any more; treat as shutdown.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
