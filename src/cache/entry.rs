//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

/// Longest lifetime an entry can have. Larger TTLs are clamped to it so the
/// expiry instant is always representable.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Cache Entry ==
/// A single cached value and the instant it stops being visible.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiration instant
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`, with `ttl` capped at
    /// [`MAX_TTL`].
    pub fn new(value: V, now: Instant, ttl: Duration) -> Self {
        let expires_at = now
            .checked_add(ttl.min(MAX_TTL))
            .unwrap_or(now);
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is live strictly before `expires_at`; at `expires_at` it is
    /// already gone.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime at `now`, zero once expired.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}
