//! # slate-sheets-csv
//!
//! CSV export for slate-sheets grids.

mod error;
mod options;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvWriteOptions, LineTerminator};
pub use writer::CsvWriter;
