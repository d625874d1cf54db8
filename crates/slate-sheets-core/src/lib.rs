//! # slate-sheets-core
//!
//! Core data structures for the slate-sheets spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout slate-sheets:
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`Cell`] and [`CellValue`] - Committed cells and computed values
//! - [`Grid`] - The sparse cell store
//!
//! ## Example
//!
//! ```rust
//! use slate_sheets_core::{Cell, CellAddress, Grid};
//!
//! let mut grid = Grid::new();
//! let a1 = CellAddress::parse("A1").unwrap();
//!
//! grid.set(a1, Cell::literal("Hello"));
//! assert_eq!(grid.display_value(&a1), "Hello");
//!
//! // Absent cells read as empty
//! let b2 = CellAddress::parse("B2").unwrap();
//! assert_eq!(grid.display_value(&b2), "");
//! ```

pub mod cell;
pub mod error;
pub mod grid;

// Re-exports for convenience
pub use cell::{
    coerce_number, format_number, Cell, CellAddress, CellError, CellRange, CellRangeIterator,
    CellValue,
};
pub use error::{Error, Result};
pub use grid::{Grid, GridOptions};

/// Maximum number of rows addressable in a grid
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns addressable in a grid
pub const MAX_COLS: u16 = 16_384;
