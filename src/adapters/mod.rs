//! Adapters - Concrete implementations of ports.

pub mod http;
