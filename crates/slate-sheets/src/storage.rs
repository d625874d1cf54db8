//! Grid persistence
//!
//! A grid is stored as one JSON object under a fixed key:
//!
//! ```json
//! {
//!   "A1": { "value": "5" },
//!   "B1": { "value": "=SUM(A1:A2)", "formula": "=SUM(A1:A2)", "computedValue": 15 }
//! }
//! ```
//!
//! Loading is lenient: a missing key or unreadable JSON yields an empty grid.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};
use slate_sheets_core::{Cell, CellAddress, CellError, CellValue, Grid, GridOptions};

/// Key-value store holding serialized grids
pub trait Storage {
    /// Read the data stored under `key`, if any
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the data stored under `key`
    fn save(&mut self, key: &str, data: &str) -> StorageResult<()>;

    /// Delete the data stored under `key`; missing keys are not an error
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// In-process storage, the equivalent of a browser's local storage
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, data: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), data.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage backed by a directory, one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `dir`; the directory is created on first save
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the stored files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, data: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, data)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// One persisted cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedCell {
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    formula: Option<String>,
    #[serde(
        rename = "computedValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    computed_value: Option<PersistedValue>,
}

/// Computed values persist as a JSON number or string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum PersistedValue {
    Number(f64),
    Text(String),
}

impl From<&Cell> for PersistedCell {
    fn from(cell: &Cell) -> Self {
        let computed_value = cell.computed().map(|value| match value {
            CellValue::Number(n) => PersistedValue::Number(*n),
            CellValue::Text(s) => PersistedValue::Text(s.clone()),
            CellValue::Error(e) => PersistedValue::Text(e.to_string()),
        });
        Self {
            value: cell.raw().to_string(),
            formula: cell.formula().map(str::to_string),
            computed_value,
        }
    }
}

impl From<PersistedCell> for Cell {
    fn from(persisted: PersistedCell) -> Self {
        let computed = persisted.computed_value.map(|value| match value {
            PersistedValue::Number(n) => CellValue::Number(n),
            PersistedValue::Text(s) => match CellError::from_str(&s) {
                Some(e) => CellValue::Error(e),
                None => CellValue::Text(s),
            },
        });
        Cell::new(persisted.value, computed)
    }
}

/// Cells in row-major order, serialized as a JSON object
struct GridRecords<'a>(&'a Grid);

impl Serialize for GridRecords<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let cells = self.0.sorted_cells();
        let mut map = serializer.serialize_map(Some(cells.len()))?;
        for (addr, cell) in cells {
            map.serialize_entry(&addr.to_a1_string(), &PersistedCell::from(cell))?;
        }
        map.end()
    }
}

/// Serialize every cell of a grid to JSON
pub fn serialize_grid(grid: &Grid) -> StorageResult<String> {
    Ok(serde_json::to_string(&GridRecords(grid))?)
}

/// Rebuild a grid from its JSON form
///
/// Computed values are taken verbatim; nothing is re-evaluated. Two keys
/// naming the same cell (`"A1"` and `"a1"`) make the state invalid.
pub fn deserialize_grid(json: &str, options: &GridOptions) -> StorageResult<Grid> {
    let records: HashMap<String, PersistedCell> = serde_json::from_str(json)?;

    let mut grid = Grid::with_options(options);
    for (key, persisted) in records {
        let addr = CellAddress::parse(&key)
            .map_err(|e| StorageError::InvalidState(format!("bad cell key {key:?}: {e}")))?;
        if grid.get(&addr).is_some() {
            return Err(StorageError::InvalidState(format!(
                "cell {addr} is stored more than once"
            )));
        }
        grid.set(addr, persisted.into());
    }
    Ok(grid)
}

/// Load the grid stored under `key`
///
/// Missing or corrupt state is treated as an empty grid. Only failures of the
/// storage itself are returned as errors.
pub fn load_grid<S: Storage + ?Sized>(
    storage: &S,
    key: &str,
    options: &GridOptions,
) -> StorageResult<Grid> {
    let json = match storage.load(key)? {
        Some(json) => json,
        None => return Ok(Grid::with_options(options)),
    };

    match deserialize_grid(&json, options) {
        Ok(grid) => Ok(grid),
        Err(e) => {
            tracing::warn!("ignoring corrupt grid state under {key:?}: {e}");
            Ok(Grid::with_options(options))
        }
    }
}

/// Serialize the whole grid and store it under `key`
pub fn save_grid<S: Storage + ?Sized>(storage: &mut S, key: &str, grid: &Grid) -> StorageResult<()> {
    let json = serialize_grid(grid)?;
    tracing::trace!("saving {} cells under {key:?}", grid.cell_count());
    storage.save(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    fn sample_grid() -> Grid {
        let mut grid = Grid::new();
        grid.set(addr("A2"), Cell::literal("10"));
        grid.set(addr("A1"), Cell::literal("5"));
        grid.set(
            addr("B1"),
            Cell::new("=SUM(A1:A2)", Some(CellValue::Number(15.0))),
        );
        grid.set(
            addr("C1"),
            Cell::new("=1/0", Some(CellValue::Error(CellError::Div0))),
        );
        grid.set(addr("A10"), Cell::literal("later"));
        grid
    }

    #[test]
    fn test_serialized_format() {
        let json = serialize_grid(&sample_grid()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"A1":{"value":"5"},"#,
                r#""B1":{"value":"=SUM(A1:A2)","formula":"=SUM(A1:A2)","computedValue":15.0},"#,
                r##""C1":{"value":"=1/0","formula":"=1/0","computedValue":"#DIV/0!"},"##,
                r#""A2":{"value":"10"},"#,
                r#""A10":{"value":"later"}}"#
            )
        );
    }

    #[test]
    fn test_grid_survives_storage() {
        let grid = sample_grid();
        let mut storage = MemoryStorage::new();
        save_grid(&mut storage, "sheet", &grid).unwrap();

        let loaded = load_grid(&storage, "sheet", &GridOptions::default()).unwrap();
        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_loads_original_format() {
        let json = r#"{"A1":{"value":"7"},"B1":{"value":"=A1*2","computedValue":14}}"#;
        let grid = deserialize_grid(json, &GridOptions::default()).unwrap();
        assert_eq!(grid.display_value(&addr("B1")), "14");
        assert_eq!(grid.get(&addr("B1")).unwrap().formula(), Some("=A1*2"));
    }

    #[test]
    fn test_duplicate_cell_keys_are_rejected() {
        let json = r#"{"A1":{"value":"upper"},"a1":{"value":"lower"}}"#;
        assert!(matches!(
            deserialize_grid(json, &GridOptions::default()),
            Err(StorageError::InvalidState(_))
        ));

        let mut storage = MemoryStorage::new();
        storage.save("sheet", json).unwrap();
        let grid = load_grid(&storage, "sheet", &GridOptions::default()).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_missing_key_is_empty_grid() {
        let storage = MemoryStorage::new();
        let grid = load_grid(&storage, "nothing", &GridOptions::default()).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_corrupt_state_is_empty_grid() {
        let mut storage = MemoryStorage::new();
        storage.save("sheet", "{not json").unwrap();
        let grid = load_grid(&storage, "sheet", &GridOptions::default()).unwrap();
        assert!(grid.is_empty());

        storage.save("sheet", r#"{"1A":{"value":"x"}}"#).unwrap();
        let grid = load_grid(&storage, "sheet", &GridOptions::default()).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("state"));

        assert_eq!(storage.load("sheet").unwrap(), None);
        storage.save("sheet", "{}").unwrap();
        assert_eq!(storage.load("sheet").unwrap().as_deref(), Some("{}"));

        storage.remove("sheet").unwrap();
        storage.remove("sheet").unwrap();
        assert_eq!(storage.load("sheet").unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.save("../escape", "{}"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(storage.load("").is_err());
    }
}
