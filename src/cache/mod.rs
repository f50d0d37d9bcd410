//! Cache Module
//!
//! Provides an in-memory, generic TTL cache with lazy expiration and a
//! background sweep hook.

mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, MAX_TTL};
pub use stats::CacheStats;
pub use store::TtlCache;

/// Anything the background sweep task can purge of expired entries.
pub trait Sweep: Send + Sync {
    /// Removes expired entries, returning how many were removed.
    fn sweep_expired(&self) -> usize;
}
