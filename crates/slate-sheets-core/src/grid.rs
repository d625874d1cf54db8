//! Sparse cell grid

use ahash::AHashMap;

use crate::cell::{Cell, CellAddress, CellRange};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// Grid dimensions used when a grid is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    /// Number of visible rows (default: 20)
    pub rows: u32,
    /// Number of visible columns (default: 10)
    pub cols: u16,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self { rows: 20, cols: 10 }
    }
}

/// A sparse mapping from address to [`Cell`]
///
/// `rows` and `cols` bound navigation and export only. Any address can hold a
/// cell, and absent addresses read as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: AHashMap<CellAddress, Cell>,
    rows: u32,
    cols: u16,
}

impl Default for Grid {
    fn default() -> Self {
        Self::with_options(&GridOptions::default())
    }
}

impl Grid {
    /// Create an empty grid with default dimensions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty grid with the given dimensions
    pub fn with_options(options: &GridOptions) -> Self {
        Self {
            cells: AHashMap::new(),
            rows: options.rows.clamp(1, MAX_ROWS),
            cols: options.cols.clamp(1, MAX_COLS),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Change the grid bounds. Cells outside the new bounds are kept.
    pub fn resize(&mut self, rows: u32, cols: u16) -> Result<()> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        if rows > MAX_ROWS {
            return Err(Error::RowOutOfBounds(rows, MAX_ROWS));
        }
        if cols > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(cols as u32, MAX_COLS));
        }
        self.rows = rows;
        self.cols = cols;
        Ok(())
    }

    /// The range covered by the grid bounds
    pub fn bounds(&self) -> CellRange {
        CellRange::new(
            CellAddress::new(0, 0),
            CellAddress::new(self.rows - 1, self.cols - 1),
        )
    }

    /// Get a cell
    pub fn get(&self, addr: &CellAddress) -> Option<&Cell> {
        self.cells.get(addr)
    }

    /// Store a cell, replacing whatever was at the address
    pub fn set(&mut self, addr: CellAddress, cell: Cell) {
        self.cells.insert(addr, cell);
    }

    /// Remove a cell
    pub fn remove(&mut self, addr: &CellAddress) -> Option<Cell> {
        self.cells.remove(addr)
    }

    /// Remove every cell
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Displayed value at an address; empty string when no cell exists
    pub fn display_value(&self, addr: &CellAddress) -> String {
        self.cells
            .get(addr)
            .map(Cell::display_value)
            .unwrap_or_default()
    }

    /// Value at an address coerced to a number (non-numeric and empty are 0)
    pub fn numeric_value(&self, addr: &CellAddress) -> f64 {
        self.cells.get(addr).map(Cell::numeric_value).unwrap_or(0.0)
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cells are stored
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over stored cells in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&CellAddress, &Cell)> {
        self.cells.iter()
    }

    /// Stored cells sorted in row-major order
    pub fn sorted_cells(&self) -> Vec<(CellAddress, &Cell)> {
        let mut cells: Vec<_> = self.cells.iter().map(|(a, c)| (*a, c)).collect();
        cells.sort_by_key(|(addr, _)| *addr);
        cells
    }

    /// Smallest range from A1 covering every stored cell
    pub fn used_bounds(&self) -> Option<CellRange> {
        let max_row = self.cells.keys().map(|a| a.row).max()?;
        let max_col = self.cells.keys().map(|a| a.col).max()?;
        Some(CellRange::new(
            CellAddress::new(0, 0),
            CellAddress::new(max_row, max_col),
        ))
    }
}
