//! Grid Module
//!
//! Fixed-column grid layout for the feed page.

mod layout;


pub use layout::{
    build, column_width, GridCell, GridItem, GridLayout, GridLayoutBuilder, GridRow, GRID_UNITS,
};
