//! API Module
//!
//! HTTP handlers and routing for the feed service.
//!
//! # Endpoints
//! - `GET /` - Feed page
//! - `GET /api/feed` - Feed layout as JSON
//! - `GET /api/layout` - Layout of placeholder items
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
