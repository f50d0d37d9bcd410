//! HTTP client for the upstream photo API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::{FeedError, Result};
use crate::upstream::{ApiEnvelope, Media, MediaSource, User};

/// [`MediaSource`] backed by the upstream REST API.
#[derive(Debug, Clone)]
pub struct HttpMediaSource {
    http: reqwest::Client,
    base_url: Url,
    client_id: String,
}

impl HttpMediaSource {
    pub fn new(base_url: &str, client_id: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| FeedError::Config(format!("invalid BASE_URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FeedError::Config(format!(
                "BASE_URL '{base_url}' cannot carry a path"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            client_id: client_id.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url, &config.client_id, config.request_timeout())
    }

    /// Base URL extended by `segments`, each percent-encoded as one path
    /// segment. An empty final segment yields a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FeedError::Config(format!("BASE_URL '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GETs the endpoint at `segments` and unwraps the `data` payload of the
    /// envelope.
    ///
    /// The body is decoded regardless of HTTP status, since the API reports
    /// errors in `meta` with a 4xx status.
    async fn get_data<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        debug!(%url, "requesting upstream");

        let envelope: ApiEnvelope<T> = self
            .http
            .get(url)
            .query(&[("client_id", self.client_id.as_str())])
            .query(query)
            .send()
            .await?
            .json()
            .await?;

        envelope.into_data()
    }
}

#[async_trait]
impl MediaSource for HttpMediaSource {
    async fn fetch_user_id(&self, username: &str) -> Result<String> {
        let users: Vec<User> = self.get_data(&["users", "search"], &[("q", username)]).await?;

        users
            .into_iter()
            .find(|user| user.username == username)
            .map(|user| user.id)
            .ok_or_else(|| FeedError::Upstream(format!("user '{username}' not found")))
    }

    async fn fetch_recent_media(&self, user_id: &str, count: usize) -> Result<Vec<Media>> {
        let count = count.to_string();
        self.get_data(
            &["users", user_id, "media", "recent", ""],
            &[("count", count.as_str())],
        )
        .await
    }
}
