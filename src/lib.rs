//! Indexer - Joins user and video records and submits them to an index service.
//!
//! Hexagonal Architecture:
//! - domain/: Pure values (work items, records)
//! - ports/: Trait definitions for the remote services
//! - adapters/: Concrete HTTP implementations
//! - application/: The engine (item processor, queue, workers, retries, watchdog)
//! - config: Environment configuration
//! - error: Error types

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for convenience
pub use application::engine::{ExecutionReport, IndexEngine, Outcome};
pub use config::{EngineConfig, RetryPolicy};
pub use domain::records::{JoinedRecord, User, Video};
pub use domain::work::WorkItem;
