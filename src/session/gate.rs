//! One-shot hydration latch.

use tokio::sync::watch;

/// Opens exactly once and never closes. Waiters registered before or after
/// the opening all observe it.
#[derive(Debug)]
pub struct HydrationGate {
    tx: watch::Sender<bool>,
}

impl HydrationGate {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Open the gate. Returns `true` only for the call that opened it.
    pub fn open(&self) -> bool {
        self.tx.send_if_modified(|open| {
            if *open {
                return false;
            }
            *open = true;
            true
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the gate has opened.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a close.
        let _ = rx.wait_for(|open| *open).await;
    }
}

impl Default for HydrationGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
