//! Single-slot handoff queue of pending work items.
//!
//! The producer and every retry task hold a `WorkSender`; workers share one
//! `WorkReceiver`. Each item is handed to exactly one worker. The queue
//! closes once every receiver handle has been dropped, after which pending
//! sends fail.

use crate::domain::work::WorkItem;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Buffer size of the queue. A send blocks until this slot is free.
pub const QUEUE_CAPACITY: usize = 1;

pub fn work_queue() -> (WorkSender, WorkReceiver) {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    (
        WorkSender { tx },
        WorkReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

#[derive(Clone, Debug)]
pub struct WorkSender {
    tx: mpsc::Sender<WorkItem>,
}

impl WorkSender {
    /// Wait for a free slot and hand `item` over.
    /// Gives the item back if the queue has been closed.
    pub async fn send(&self, item: WorkItem) -> Result<(), WorkItem> {
        self.tx.send(item).await.map_err(|err| err.0)
    }
}

#[derive(Clone, Debug)]
pub struct WorkReceiver {
    rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
}

impl WorkReceiver {
    /// Wait for the next item. Returns `None` once the queue is closed and drained.
    pub async fn recv(&self) -> Option<WorkItem> {
        self.rx.lock().await.recv().await
    }

    /// Refuse further sends. Items already buffered can still be received.
    pub async fn close(&self) {
        self.rx.lock().await.close();
    }
}
