//! Grid Layout Module
//!
//! Partitions an ordered item list into uniform-width rows for a 12-unit
//! responsive grid.

use serde::Serialize;

use crate::error::{FeedError, Result};

/// Width of one grid row in layout units.
pub const GRID_UNITS: usize = 12;

/// An item that can be placed in a grid cell.
pub trait GridItem {
    /// Link the rendered cell points to.
    fn href(&self) -> String;
}

// == Grid Cell ==
/// One column slot of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridCell<T> {
    Occupied { item: T, href: String },
    /// Placeholder that keeps the final row at full width
    Empty,
}

impl<T> GridCell<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, GridCell::Empty)
    }
}

// == Grid Row ==
/// A row of exactly `items_per_row` cells, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GridRow<T> {
    pub cells: Vec<GridCell<T>>,
}

impl<T> GridRow<T> {
    /// Number of occupied cells in this row.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }
}

// == Grid Layout ==
/// Rows plus the per-cell width the renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridLayout<T> {
    pub items_per_row: usize,
    pub column_width: usize,
    pub rows: Vec<GridRow<T>>,
}

fn check_items_per_row(items_per_row: usize) -> Result<()> {
    if items_per_row == 0 {
        return Err(FeedError::InvalidArgument(
            "items_per_row must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Width of one cell in grid units: `floor(12 / items_per_row)`.
///
/// Only 1, 2, 3, 4, 6 and 12 fill a row exactly. Other counts are accepted
/// and leave `12 - width * items_per_row` units unused (or yield width 0
/// above 12).
pub fn column_width(items_per_row: usize) -> Result<usize> {
    check_items_per_row(items_per_row)?;
    Ok(GRID_UNITS / items_per_row)
}

// == Build ==
/// Splits `items` into rows of `items_per_row` cells.
///
/// Rows fill left to right in input order. If the item count is not a
/// multiple of `items_per_row`, the final row is padded with
/// [`GridCell::Empty`]. No items yields no rows.
pub fn build<T: GridItem>(items: Vec<T>, items_per_row: usize) -> Result<Vec<GridRow<T>>> {
    check_items_per_row(items_per_row)?;
    Ok(fill_rows(items, items_per_row))
}

/// `items_per_row` must already be validated as non-zero.
fn fill_rows<T: GridItem>(items: Vec<T>, items_per_row: usize) -> Vec<GridRow<T>> {
    let row_count = items.len().div_ceil(items_per_row);
    let mut rows = Vec::with_capacity(row_count);
    let mut cells = Vec::with_capacity(items_per_row);

    for item in items {
        let href = item.href();
        cells.push(GridCell::Occupied { item, href });
        if cells.len() == items_per_row {
            rows.push(GridRow {
                cells: std::mem::replace(&mut cells, Vec::with_capacity(items_per_row)),
            });
        }
    }

    if !cells.is_empty() {
        cells.resize_with(items_per_row, || GridCell::Empty);
        rows.push(GridRow { cells });
    }

    rows
}

// == Builder ==
/// Validated grid configuration, reused across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayoutBuilder {
    items_per_row: usize,
}

impl GridLayoutBuilder {
    pub fn new(items_per_row: usize) -> Result<Self> {
        check_items_per_row(items_per_row)?;
        Ok(Self { items_per_row })
    }

    /// Accepts a signed count as it arrives from query strings; zero and
    /// negatives are rejected.
    pub fn from_signed(items_per_row: i64) -> Result<Self> {
        let items_per_row = usize::try_from(items_per_row).map_err(|_| {
            FeedError::InvalidArgument(format!(
                "items_per_row must be at least 1, got {items_per_row}"
            ))
        })?;
        Self::new(items_per_row)
    }

    pub fn items_per_row(&self) -> usize {
        self.items_per_row
    }

    pub fn build<T: GridItem>(&self, items: Vec<T>) -> Vec<GridRow<T>> {
        fill_rows(items, self.items_per_row)
    }

    pub fn layout<T: GridItem>(&self, items: Vec<T>) -> GridLayout<T> {
        GridLayout {
            items_per_row: self.items_per_row,
            column_width: GRID_UNITS / self.items_per_row,
            rows: self.build(items),
        }
    }
}
