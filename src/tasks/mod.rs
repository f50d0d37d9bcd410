//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Sweep: Removes expired entries from the feed caches at a fixed interval

mod sweep;

pub use sweep::spawn_sweep_task;
