//! Upstream Module
//!
//! Access to the photo-sharing API the feed is built from.

mod client;
mod models;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpMediaSource;
pub use models::{
    ApiEnvelope, Comment, Counted, Image, Images, Location, LocationId, Media, Meta,
    UnixTimeString, User, Videos,
};

/// Source of the feed's user id and media list.
///
/// Called only on a cache miss. Implementations report failures as
/// [`FeedError::Upstream`](crate::error::FeedError::Upstream) and do not retry.
#[async_trait]
pub trait MediaSource: Send + Sync + 'static {
    /// Resolves `username` to the upstream user id.
    async fn fetch_user_id(&self, username: &str) -> Result<String>;

    /// Fetches up to `count` most recent media items of `user_id`.
    async fn fetch_recent_media(&self, user_id: &str, count: usize) -> Result<Vec<Media>>;
}
