//! API Handlers
//!
//! HTTP request handlers for each feed service endpoint.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::config::Config;
use crate::error::Result;
use crate::feed::{FeedOptions, FeedService};
use crate::grid::{GridLayout, GridLayoutBuilder};
use crate::models::{HealthResponse, LayoutQuery, PlaceholderItem, StatsResponse};
use crate::render::{render_error_page, render_page};
use crate::upstream::{Media, MediaSource};

/// Application state shared across all handlers.
///
/// Holds the feed service (and through it both caches) behind an `Arc`, so
/// cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedService>,
    /// Root of the `css/` and `js/` asset directories
    pub static_dir: PathBuf,
}

impl AppState {
    /// Creates a new AppState around an existing feed service.
    pub fn new(feed: FeedService, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            feed: Arc::new(feed),
            static_dir: static_dir.into(),
        }
    }

    /// Creates a new AppState from configuration and an upstream source.
    pub fn from_config(config: &Config, source: Arc<dyn MediaSource>) -> Result<Self> {
        let options = FeedOptions::from_config(config)?;
        Ok(Self::new(
            FeedService::new(source, options),
            config.static_dir.clone(),
        ))
    }

    fn page_title(&self) -> String {
        format!("@{}", self.feed.options().username)
    }
}

/// Handler for GET /
///
/// Renders the feed page. Upstream failures produce a degraded page with the
/// matching status instead of an error body.
pub async fn feed_page_handler(State(state): State<AppState>) -> Response {
    let title = state.page_title();
    match state.feed.layout().await {
        Ok(layout) => Html(render_page(&title, &layout)).into_response(),
        Err(err) => {
            warn!(error = %err, "feed unavailable, serving degraded page");
            (err.status(), Html(render_error_page(&title, &err.to_string()))).into_response()
        }
    }
}

/// Handler for GET /api/feed
///
/// Returns the current feed layout as JSON.
pub async fn feed_json_handler(State(state): State<AppState>) -> Result<Json<GridLayout<Media>>> {
    Ok(Json(state.feed.layout().await?))
}

/// Handler for GET /api/layout
///
/// Lays out `count` placeholder items, using the configured column count
/// unless `items_per_row` is given. A malformed query string is reported as
/// an invalid argument in the usual JSON error body.
pub async fn layout_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<LayoutQuery>, QueryRejection>,
) -> Result<Json<GridLayout<PlaceholderItem>>> {
    let Query(query) = query?;
    let count = query.count()?;
    let grid = match query.items_per_row {
        Some(items_per_row) => GridLayoutBuilder::from_signed(items_per_row)?,
        None => state.feed.options().grid,
    };

    let items = (0..count).map(|index| PlaceholderItem { index }).collect();
    Ok(Json(grid.layout(items)))
}

/// Handler for GET /stats
///
/// Returns statistics of both feed caches.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(&state.feed.stats()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
