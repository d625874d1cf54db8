//! Grid controller
//!
//! Owns the grid, the selection cursor and the (at most one) cell under edit.
//! Every commit evaluates formulas once and then writes the whole grid to
//! storage. Formulas are not recomputed when the cells they read change.

use slate_sheets_core::{Cell, CellAddress, Grid, GridOptions};
use slate_sheets_formula::{evaluate_formula, EvaluationContext};

use crate::error::StorageResult;
use crate::storage::{load_grid, save_grid, Storage};

/// Default storage key for the grid
pub const DEFAULT_STORAGE_KEY: &str = "spreadsheet-data";

/// Options for creating a [`GridController`]
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Grid dimensions
    pub grid: GridOptions,
    /// Key the grid is persisted under (default: "spreadsheet-data")
    pub storage_key: String,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            grid: GridOptions::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Arrow-key directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Keys understood by [`GridController::handle_key`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Arrow(Direction),
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    Char(char),
}

/// The cell under edit and its uncommitted input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub address: CellAddress,
    pub buffer: String,
}

/// Selection, editing and persistence on top of a [`Grid`]
pub struct GridController<S: Storage> {
    grid: Grid,
    selection: CellAddress,
    edit: Option<EditState>,
    storage: S,
    storage_key: String,
}

impl<S: Storage> GridController<S> {
    /// Create a controller, loading any grid saved under the configured key
    pub fn open(storage: S, options: &ControllerOptions) -> StorageResult<Self> {
        let grid = load_grid(&storage, &options.storage_key, &options.grid)?;
        tracing::debug!(
            "opened grid {:?} with {} cells",
            options.storage_key,
            grid.cell_count()
        );
        Ok(Self::with_grid(grid, storage, options.storage_key.clone()))
    }

    /// Create a controller around an existing grid
    pub fn with_grid(grid: Grid, storage: S, storage_key: String) -> Self {
        Self {
            grid,
            selection: CellAddress::new(0, 0),
            edit: None,
            storage,
            storage_key,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// The selected address
    pub fn selection(&self) -> CellAddress {
        self.selection
    }

    /// The active edit, if any
    pub fn editing(&self) -> Option<&EditState> {
        self.edit.as_ref()
    }

    /// The committed cell at an address
    pub fn cell(&self, addr: &CellAddress) -> Option<&Cell> {
        self.grid.get(addr)
    }

    /// Displayed value at an address
    pub fn display_value(&self, addr: &CellAddress) -> String {
        self.grid.display_value(addr)
    }

    /// Select a cell, clamped to the grid bounds
    pub fn select(&mut self, addr: CellAddress) {
        self.selection = self.clamp(addr);
    }

    /// Start editing a cell with its raw input in the buffer
    ///
    /// Any edit already in progress is discarded.
    pub fn begin_edit(&mut self, addr: CellAddress) {
        let address = self.clamp(addr);
        let buffer = self
            .grid
            .get(&address)
            .map(|cell| cell.raw().to_string())
            .unwrap_or_default();
        self.selection = address;
        self.edit = Some(EditState { address, buffer });
    }

    /// Replace the edit buffer; does nothing when no edit is active
    pub fn set_buffer<T: Into<String>>(&mut self, text: T) {
        if let Some(edit) = self.edit.as_mut() {
            edit.buffer = text.into();
        }
    }

    /// Mutable access to the edit buffer
    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        self.edit.as_mut().map(|edit| &mut edit.buffer)
    }

    /// Commit raw input to a cell and persist the grid
    ///
    /// Input starting with `=` is evaluated against the grid as it is now.
    /// Empty input removes the cell. Any edit in progress is closed.
    pub fn commit_edit(&mut self, addr: CellAddress, raw: &str) -> StorageResult<()> {
        self.edit = None;

        if raw.is_empty() {
            self.grid.remove(&addr);
        } else {
            let computed = Cell::is_formula_input(raw)
                .then(|| evaluate_formula(raw, &EvaluationContext::new(&self.grid)));
            self.grid.set(addr, Cell::new(raw, computed));
        }

        tracing::debug!("committed {addr} = {raw:?}");
        self.persist()
    }

    /// Commit the active edit buffer, returning the address written
    ///
    /// Returns `None` when nothing was being edited.
    pub fn commit_current(&mut self) -> StorageResult<Option<CellAddress>> {
        match self.edit.take() {
            Some(EditState { address, buffer }) => {
                self.commit_edit(address, &buffer)?;
                Ok(Some(address))
            }
            None => Ok(None),
        }
    }

    /// Discard the active edit
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Remove every cell and persist the empty grid
    pub fn clear(&mut self) -> StorageResult<()> {
        self.edit = None;
        self.grid.clear();
        tracing::debug!("cleared grid {:?}", self.storage_key);
        self.persist()
    }

    /// Change the grid bounds, keeping the selection inside them
    pub fn resize(&mut self, rows: u32, cols: u16) -> slate_sheets_core::Result<()> {
        self.grid.resize(rows, cols)?;
        self.selection = self.clamp(self.selection);
        let bounds = self.grid.bounds();
        if self
            .edit
            .as_ref()
            .map_or(false, |edit| !bounds.contains(&edit.address))
        {
            self.edit = None;
        }
        Ok(())
    }

    /// Move the selection one cell, stopping at the edges
    pub fn navigate(&mut self, direction: Direction) {
        let CellAddress { row, col } = self.selection;
        let next = match direction {
            Direction::Up => CellAddress::new(row.saturating_sub(1), col),
            Direction::Down => CellAddress::new(row.saturating_add(1), col),
            Direction::Left => CellAddress::new(row, col.saturating_sub(1)),
            Direction::Right => CellAddress::new(row, col.saturating_add(1)),
        };
        self.selection = self.clamp(next);
    }

    /// Keyboard dispatch
    ///
    /// - arrows move the selection when no edit is active
    /// - Enter starts editing, or commits and moves down
    /// - Tab commits any edit and moves right, stopping at the last column
    /// - Escape cancels the edit
    /// - characters append to the edit buffer, starting a fresh edit if needed
    /// - Backspace removes the last buffered character
    /// - Delete empties the selected cell
    ///
    /// Returns the address the key committed to, if it committed anything.
    pub fn handle_key(&mut self, key: Key) -> StorageResult<Option<CellAddress>> {
        let mut committed = None;
        match key {
            Key::Arrow(direction) => {
                if self.edit.is_none() {
                    self.navigate(direction);
                }
            }
            Key::Enter => {
                committed = self.commit_current()?;
                if committed.is_some() {
                    self.navigate(Direction::Down);
                } else {
                    self.begin_edit(self.selection);
                }
            }
            Key::Tab => {
                committed = self.commit_current()?;
                self.navigate(Direction::Right);
            }
            Key::Escape => self.cancel_edit(),
            Key::Backspace => {
                if let Some(buffer) = self.edit_buffer_mut() {
                    buffer.pop();
                }
            }
            Key::Delete => {
                if self.edit.is_none() {
                    let address = self.selection;
                    self.commit_edit(address, "")?;
                    committed = Some(address);
                }
            }
            Key::Char(c) => {
                let address = self.selection;
                let edit = self.edit.get_or_insert_with(|| EditState {
                    address,
                    buffer: String::new(),
                });
                edit.buffer.push(c);
            }
        }
        Ok(committed)
    }

    fn clamp(&self, addr: CellAddress) -> CellAddress {
        CellAddress::new(
            addr.row.min(self.grid.rows() - 1),
            addr.col.min(self.grid.cols() - 1),
        )
    }

    fn persist(&mut self) -> StorageResult<()> {
        save_grid(&mut self.storage, &self.storage_key, &self.grid)
    }
}
