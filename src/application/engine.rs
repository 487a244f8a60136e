use crate::application::processor::ItemProcessor;
use crate::application::producer::work_items;
use crate::application::queue::{work_queue, WorkReceiver, WorkSender};
use crate::application::retry::Retrier;
use crate::application::watchdog::{pulse_channel, IdleWatchdog, PulseSender};
use crate::config::EngineConfig;
use crate::domain::records::{User, Video};
use crate::domain::work::WorkItem;
use crate::ports::index::IndexSink;
use crate::ports::resource::RecordSource;
use futures::{Stream, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No successful submission for a full inactivity window
    Idle,
    /// The caller cancelled the run
    Cancelled,
}

/// Counters returned by one worker when it stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub submitted: u64,
    pub failed_attempts: u64,
}

/// Summary of one `execute` call, aggregated from the values each task returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub outcome: Outcome,
    /// Items accepted from the input stream
    pub produced: u64,
    /// Items joined and accepted by the index service
    pub submitted: u64,
    /// Failed processing attempts, each of which scheduled a retry
    pub failed_attempts: u64,
    /// Activity signals the watchdog took in before firing, zero when cancelled.
    /// Signals coalesce, so this is at most `submitted`.
    pub pulses: u64,
    pub elapsed: Duration,
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: produced {}, submitted {}, failed attempts {}",
            self.outcome, self.produced, self.submitted, self.failed_attempts
        )
    }
}

/// Worker pool plus inactivity watchdog around an `ItemProcessor`.
pub struct IndexEngine<U, V, I> {
    config: EngineConfig,
    processor: Arc<ItemProcessor<U, V, I>>,
}

impl<U, V, I> IndexEngine<U, V, I>
where
    U: RecordSource<User> + 'static,
    V: RecordSource<Video> + 'static,
    I: IndexSink + 'static,
{
    pub fn new(config: EngineConfig, processor: ItemProcessor<U, V, I>) -> Self {
        Self {
            config,
            processor: Arc::new(processor),
        }
    }

    /// Run the engine over `user_id,video_id` lines read from `reader`.
    pub async fn execute_reader<R>(&self, reader: R, cancel: CancellationToken) -> ExecutionReport
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        self.execute(work_items(reader), cancel).await
    }

    /// Process every item of `items`, retrying failures, until the watchdog
    /// sees a full inactivity window or `cancel` fires.
    ///
    /// Returns without waiting for the input to be exhausted. Work still queued
    /// or being retried at that point is abandoned.
    pub async fn execute<S>(&self, items: S, cancel: CancellationToken) -> ExecutionReport
    where
        S: Stream<Item = WorkItem> + Send + 'static,
    {
        let started = Instant::now();
        let shutdown = cancel.child_token();

        let (sender, receiver) = work_queue();
        let (pulses, pulse_rx) = pulse_channel();
        let retrier = Retrier::new(sender.clone(), self.config.retry.clone(), shutdown.clone());

        let mut watchdog = tokio::spawn(IdleWatchdog::new(self.config.idle_timeout, pulse_rx).run());

        let workers: Vec<JoinHandle<WorkerStats>> = (0..self.config.threads)
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    self.processor.clone(),
                    receiver.clone(),
                    pulses.clone(),
                    retrier.clone(),
                    shutdown.clone(),
                ))
            })
            .collect();

        // Workers and retry tasks keep their own handles
        drop(pulses);
        drop(receiver);
        drop(retrier);

        let producer = tokio::spawn(produce(items, sender, shutdown.clone()));

        let (outcome, pulse_count) = tokio::select! {
            fired = &mut watchdog => match fired {
                Ok(count) => (Outcome::Idle, count),
                Err(e) => {
                    warn!("Watchdog task failed: {}", e);
                    (Outcome::Idle, 0)
                }
            },
            _ = cancel.cancelled() => {
                watchdog.abort();
                (Outcome::Cancelled, 0)
            }
        };
        shutdown.cancel();

        let mut report = ExecutionReport {
            outcome,
            produced: 0,
            submitted: 0,
            failed_attempts: 0,
            pulses: pulse_count,
            elapsed: Duration::ZERO,
        };

        for worker in workers {
            match worker.await {
                Ok(stats) => {
                    report.submitted += stats.submitted;
                    report.failed_attempts += stats.failed_attempts;
                }
                Err(e) => warn!("Worker task failed: {}", e),
            }
        }

        match producer.await {
            Ok(produced) => report.produced = produced,
            Err(e) => warn!("Producer task failed: {}", e),
        }

        report.elapsed = started.elapsed();
        info!("Run finished: {}", report);
        report
    }
}

/// Feed `items` into the queue until the input ends or the run shuts down.
async fn produce<S>(items: S, queue: WorkSender, shutdown: CancellationToken) -> u64
where
    S: Stream<Item = WorkItem> + Send + 'static,
{
    let mut produced = 0;
    let mut items = Box::pin(items);

    loop {
        let item = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            item = items.next() => match item {
                Some(item) => item,
                None => break,
            },
        };

        let sent = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            sent = queue.send(item) => sent,
        };
        if sent.is_err() {
            break;
        }
        produced += 1;
    }

    debug!("Producer done after {} items", produced);
    produced
}

/// Take items off the queue until it closes or the run shuts down.
/// Successes pulse the watchdog; failures are handed to the retrier.
async fn worker_loop<U, V, I>(
    worker_id: usize,
    processor: Arc<ItemProcessor<U, V, I>>,
    queue: WorkReceiver,
    pulses: PulseSender,
    retrier: Retrier,
    shutdown: CancellationToken,
) -> WorkerStats
where
    U: RecordSource<User>,
    V: RecordSource<Video>,
    I: IndexSink,
{
    debug!("[Worker {}] Started", worker_id);
    let mut stats = WorkerStats::default();

    loop {
        let item = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            item = queue.recv() => match item {
                Some(item) => item,
                None => break,
            },
        };

        let result = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            result = processor.process(&item) => result,
        };

        match result {
            Ok(_) => {
                stats.submitted += 1;
                pulses.pulse();
            }
            Err(e) => {
                stats.failed_attempts += 1;
                debug!(
                    "[Worker {}] ({}, {}) failed at {} ({}): {}",
                    worker_id,
                    item.user_id,
                    item.video_id,
                    e.stage(),
                    e.remote().kind(),
                    e
                );
                retrier.schedule(item);
            }
        }
    }

    debug!("[Worker {}] Stopped", worker_id);
    stats
}
