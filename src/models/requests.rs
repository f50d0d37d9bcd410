//! Request DTOs for the feed service API
//!
//! Defines the structure of incoming query strings.

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::grid::GridItem;

/// Upper bound on synthetic items per layout request
pub const MAX_LAYOUT_COUNT: i64 = 1000;

/// Query for the layout diagnostic (GET /api/layout)
///
/// Both fields are signed so that negative input reaches validation instead
/// of failing deserialization with a generic message.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutQuery {
    /// Number of placeholder items to lay out
    pub count: i64,
    /// Columns per row; falls back to the configured value
    #[serde(default)]
    pub items_per_row: Option<i64>,
}

impl LayoutQuery {
    /// Validated item count.
    pub fn count(&self) -> Result<usize> {
        if !(0..=MAX_LAYOUT_COUNT).contains(&self.count) {
            return Err(FeedError::InvalidArgument(format!(
                "count must be between 0 and {MAX_LAYOUT_COUNT}"
            )));
        }
        Ok(self.count as usize)
    }
}

/// Stand-in item used by the layout diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderItem {
    pub index: usize,
}

impl GridItem for PlaceholderItem {
    fn href(&self) -> String {
        format!("#item-{}", self.index)
    }
}
