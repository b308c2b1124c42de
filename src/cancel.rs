//! Cancellation signal for check and update runs
//!
//! A `CancelHandle` fires once; every cloned `Cancellation` observes it.

use tokio::sync::watch;

/// Sending half, owned by whoever decides to stop the run (e.g. a Ctrl-C handler)
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Receiving half passed into long-running operations
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

/// Create a connected handle/token pair
pub fn cancellation() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, Cancellation { rx })
}

impl CancelHandle {
    /// Fire the signal; later calls are no-ops
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Create another token observing this handle
    pub fn token(&self) -> Cancellation {
        Cancellation {
            rx: self.tx.subscribe(),
        }
    }
}

impl Cancellation {
    /// A token that never fires
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the signal fires. Pends forever if the handle is dropped unfired.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
