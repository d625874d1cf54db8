//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Cell`] - A committed cell: raw input, formula text and computed value
//! - [`CellValue`] - The computed value of a formula
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular range of cells (e.g., "A1:B10")

mod address;
mod data;
mod value;

pub use address::{CellAddress, CellRange, CellRangeIterator};
pub use data::Cell;
pub use value::{coerce_number, format_number, CellError, CellValue};
