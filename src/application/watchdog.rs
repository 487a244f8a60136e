//! Inactivity watchdog.
//!
//! Workers emit a liveness pulse after each successful submission. The
//! watchdog finishes once no pulse has arrived for a full `timeout` window,
//! so it measures inactivity, not total elapsed time.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Create the pulse channel. It holds at most one pending pulse; pulses sent
/// while one is pending are coalesced.
pub fn pulse_channel() -> (PulseSender, mpsc::Receiver<()>) {
    let (tx, rx) = mpsc::channel(1);
    (PulseSender { tx }, rx)
}

#[derive(Clone, Debug)]
pub struct PulseSender {
    tx: mpsc::Sender<()>,
}

impl PulseSender {
    /// Signal recent progress without blocking.
    pub fn pulse(&self) {
        // Full means a pulse is already pending; closed means the watchdog is gone.
        let _ = self.tx.try_send(());
    }
}

/// Single-shot watchdog. `run` consumes it, so it can never re-arm.
pub struct IdleWatchdog {
    timeout: Duration,
    pulses: mpsc::Receiver<()>,
}

impl IdleWatchdog {
    pub fn new(timeout: Duration, pulses: mpsc::Receiver<()>) -> Self {
        Self { timeout, pulses }
    }

    /// Wait until `timeout` passes without a pulse.
    /// Returns the number of pulses observed before going idle.
    pub async fn run(mut self) -> u64 {
        let mut observed = 0;
        loop {
            tokio::select! {
                pulse = self.pulses.recv() => match pulse {
                    Some(()) => observed += 1,
                    None => {
                        // No sender left, so no pulse can arrive any more
                        tokio::time::sleep(self.timeout).await;
                        break;
                    }
                },
                _ = tokio::time::sleep(self.timeout) => break,
            }
        }
        debug!(
            "Idle for {:?} after {} pulses, finishing",
            self.timeout, observed
        );
        observed
    }
}
