//! Photo Feed - A cached photo feed page
//!
//! Fetches an account's recent media from an upstream photo API, keeps it in
//! a TTL cache shared by all requests, and lays it out in a fixed-column grid.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod grid;
pub mod models;
pub mod render;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use error::{FeedError, Result};
pub use feed::FeedService;
pub use tasks::spawn_sweep_task;
