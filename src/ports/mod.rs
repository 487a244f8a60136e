//! Ports - Trait definitions for the remote services the engine depends on.

pub mod index;
pub mod resource;
