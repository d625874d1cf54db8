//! Prelude module - common imports for slate-sheets users
//!
//! ```rust
//! use slate_sheets::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    CellAddress,
    CellError,
    CellRange,
    CellValue,
    // Controller
    ControllerOptions,
    Direction,
    GridController,
    Key,
    // Persistence
    FileStorage,
    MemoryStorage,
    Storage,
    // Export
    ExportFormat,
    // Main types
    AppContext,
    Grid,
    GridOptions,
};
