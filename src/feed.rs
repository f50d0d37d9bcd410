//! Feed Service
//!
//! Resolves the configured account and its recent media through the TTL
//! caches, falling back to the upstream source on a miss, and lays the
//! result out as a grid.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::cache::{CacheStats, Clock, Sweep, SystemClock, TtlCache};
use crate::config::Config;
use crate::error::{FeedError, Result};
use crate::grid::{GridLayout, GridLayoutBuilder};
use crate::upstream::{Media, MediaSource};

/// Feed parameters taken from configuration at startup.
#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Account whose media is shown
    pub username: String,
    /// Media items requested per upstream fetch
    pub media_count: usize,
    /// Lifetime of cached user ids and media lists
    pub default_ttl: Duration,
    pub grid: GridLayoutBuilder,
}

impl FeedOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            username: config.username.clone(),
            media_count: config.media_count,
            default_ttl: config.default_ttl(),
            grid: GridLayoutBuilder::new(config.items_per_row)?,
        })
    }
}

/// Statistics of both feed caches.
#[derive(Debug, Clone, Serialize)]
pub struct FeedCacheStats {
    pub user_ids: CacheStats,
    pub media: CacheStats,
}

// == Feed Service ==
/// Request-time entry point shared by all handlers.
pub struct FeedService {
    source: Arc<dyn MediaSource>,
    /// username -> upstream user id
    user_ids: Arc<TtlCache<String>>,
    /// user id -> recent media
    media: Arc<TtlCache<Arc<Vec<Media>>>>,
    options: FeedOptions,
}

impl FeedService {
    pub fn new(source: Arc<dyn MediaSource>, options: FeedOptions) -> Self {
        Self::with_clock(source, options, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: Arc<dyn MediaSource>,
        options: FeedOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            user_ids: Arc::new(TtlCache::with_clock(options.default_ttl, clock.clone())),
            media: Arc::new(TtlCache::with_clock(options.default_ttl, clock)),
            options,
        }
    }

    pub fn options(&self) -> &FeedOptions {
        &self.options
    }

    /// Upstream id of the configured account, cached.
    pub async fn user_id(&self) -> Result<String> {
        let username = self.options.username.as_str();
        self.user_ids
            .get_or_try_insert_with(username, None, || async move {
                let id = self.source.fetch_user_id(username).await?;
                info!(username, user_id = %id, "resolved user id from upstream");
                Ok::<_, FeedError>(id)
            })
            .await
    }

    /// Recent media of the configured account, cached per user id.
    ///
    /// A failed fetch leaves both caches as they were, so the next request
    /// retries upstream.
    pub async fn recent_media(&self) -> Result<Arc<Vec<Media>>> {
        let user_id = self.user_id().await?;
        let count = self.options.media_count;

        self.media
            .get_or_try_insert_with(&user_id, None, || async {
                let media = self.source.fetch_recent_media(&user_id, count).await?;
                info!(user_id = %user_id, items = media.len(), "fetched recent media from upstream");
                Ok::<_, FeedError>(Arc::new(media))
            })
            .await
    }

    /// Recent media arranged in the configured grid.
    pub async fn layout(&self) -> Result<GridLayout<Media>> {
        let media = self.recent_media().await?;
        Ok(self.options.grid.layout(media.as_ref().clone()))
    }

    /// Drops both cached entries so the next request refetches.
    pub fn invalidate(&self) {
        if let Some(user_id) = self.user_ids.get(&self.options.username) {
            self.media.delete(&user_id);
        }
        self.user_ids.delete(&self.options.username);
    }

    pub fn stats(&self) -> FeedCacheStats {
        FeedCacheStats {
            user_ids: self.user_ids.stats(),
            media: self.media.stats(),
        }
    }

    /// Caches the background sweep task should purge, with their names.
    pub fn sweepers(&self) -> Vec<(&'static str, Arc<dyn Sweep>)> {
        vec![
            ("user_ids", self.user_ids.clone() as Arc<dyn Sweep>),
            ("media", self.media.clone() as Arc<dyn Sweep>),
        ]
    }
}
