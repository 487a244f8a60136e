//! Domain layer - Pure values shared by every other layer.

// Records exchanged with the remote services
pub mod records;

// Work items flowing through the queue
pub mod work;
