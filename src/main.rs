//! Indexer Binary
//!
//! Reads `user_id,video_id` lines from stdin, joins each pair's user and video
//! records and posts them to the index service. Exits once no submission has
//! succeeded for `TIMEOUT` seconds, or on Ctrl-C.
//!
//! Environment Variables:
//! - USERS_URL, VIDEOS_URL, INDEX_URL: service endpoints
//! - TIMEOUT: inactivity timeout in seconds (required)
//! - NUM_THREADS: number of workers (required)
//! - HTTP_TIMEOUT: per-request timeout in seconds
//! - RETRY_MAX_IN_FLIGHT, RETRY_DELAY_MS: retry throttling

use indexer::adapters::http::http_processor;
use indexer::{EngineConfig, IndexEngine};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let start = Instant::now();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt::init();

    let processor = match http_processor(&config) {
        Ok(processor) => processor,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Running on {} threads with a timeout of {} seconds",
        config.threads,
        config.idle_timeout.as_secs()
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let engine = IndexEngine::new(config, processor);
    let report = engine.execute_reader(tokio::io::stdin(), cancel).await;

    println!("{}", report);
    println!("Elapsed time: {:?}", start.elapsed());

    // A pending stdin read cannot be cancelled and would stall runtime shutdown
    std::process::exit(0);
}
