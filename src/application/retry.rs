//! Detached re-enqueue of failed work items.

use crate::application::queue::WorkSender;
use crate::config::RetryPolicy;
use crate::domain::work::WorkItem;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Puts failed items back on the work queue without blocking the worker
/// that saw the failure. Attempts per item are unbounded.
#[derive(Clone)]
pub struct Retrier {
    queue: WorkSender,
    permits: Option<Arc<Semaphore>>,
    policy: RetryPolicy,
    shutdown: CancellationToken,
}

impl Retrier {
    pub fn new(queue: WorkSender, policy: RetryPolicy, shutdown: CancellationToken) -> Self {
        let permits = policy
            .max_in_flight
            .map(|limit| Arc::new(Semaphore::new(limit)));

        Self {
            queue,
            permits,
            policy,
            shutdown,
        }
    }

    /// Spawn a task that re-sends `item` and then ends.
    /// Pending retries are dropped once the run shuts down.
    pub fn schedule(&self, item: WorkItem) {
        let retrier = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = retrier.shutdown.cancelled() => {}
                _ = retrier.requeue(item) => {}
            }
        });
    }

    async fn requeue(&self, item: WorkItem) {
        let _permit = match &self.permits {
            Some(permits) => match permits.clone().acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => return,
            },
            None => None,
        };

        if !self.policy.delay.is_zero() {
            tokio::time::sleep(self.policy.delay).await;
        }

        if let Err(item) = self.queue.send(item).await {
            debug!(
                "Queue closed, dropping retry of ({}, {})",
                item.user_id, item.video_id
            );
        }
    }
}
