//! Application layer - The concurrent join-and-submit engine.

pub mod engine;
pub mod processor;
pub mod producer;
pub mod queue;
pub mod retry;
pub mod watchdog;
