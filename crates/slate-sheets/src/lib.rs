//! # slate-sheets
//!
//! A small spreadsheet engine.
//!
//! ## Features
//!
//! - Sparse grid of cells addressed in A1 notation
//! - Safe formula evaluation: `+ - * /`, parentheses, cell references, `SUM` over ranges
//! - Grid controller with selection, a single edit cursor and keyboard navigation
//! - Whole-grid persistence after every commit, lenient loading
//! - CSV and JSON export
//! - Request generations so superseded asynchronous updates never overwrite newer input
//!
//! Formulas are evaluated once, when committed. A formula that reads another
//! cell keeps its result until it is itself committed again.
//!
//! ## Example
//!
//! ```rust
//! use slate_sheets::prelude::*;
//!
//! let mut sheet = GridController::open(MemoryStorage::new(), &ControllerOptions::default()).unwrap();
//! let a1 = CellAddress::parse("A1").unwrap();
//! let a2 = CellAddress::parse("A2").unwrap();
//! let b1 = CellAddress::parse("B1").unwrap();
//!
//! sheet.commit_edit(a1, "5").unwrap();
//! sheet.commit_edit(a2, "10").unwrap();
//! sheet.commit_edit(b1, "=SUM(A1:A2)").unwrap();
//! assert_eq!(sheet.display_value(&b1), "15");
//!
//! // B1 is not recomputed until it is committed again
//! sheet.commit_edit(a1, "7").unwrap();
//! assert_eq!(sheet.display_value(&b1), "15");
//! sheet.commit_edit(b1, "=SUM(A1:A2)").unwrap();
//! assert_eq!(sheet.display_value(&b1), "17");
//! ```

pub mod app;
pub mod controller;
pub mod error;
pub mod export;
pub mod prelude;
pub mod requests;
pub mod storage;

pub use app::AppContext;
pub use controller::{
    ControllerOptions, Direction, EditState, GridController, Key, DEFAULT_STORAGE_KEY,
};
pub use error::{ExportError, StorageError, StorageResult};
pub use export::{display_rows, export, export_to, to_json, ExportFormat};
pub use requests::{Acceptance, RequestGenerations, RequestTicket};
pub use storage::{
    deserialize_grid, load_grid, save_grid, serialize_grid, FileStorage, MemoryStorage, Storage,
};

// Re-export core types
pub use slate_sheets_core::{
    Cell, CellAddress, CellError, CellRange, CellValue, Error, Grid, GridOptions, Result,
    MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use slate_sheets_formula::{
    evaluate, evaluate_formula, parse_formula, EvaluationContext, FormulaError, FormulaExpr,
    FormulaResult, Reference,
};

// Re-export I/O types
pub use slate_sheets_csv::{CsvError, CsvWriteOptions, CsvWriter, LineTerminator};
