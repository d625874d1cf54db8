//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use slate_sheets_core::{CellAddress, Grid};

/// CSV exporter for grids
///
/// Writes one record per grid row (1..=rows) with one field per column
/// (1..=cols), each field being the cell's displayed value.
pub struct CsvWriter;

impl CsvWriter {
    /// Write a grid to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        grid: &Grid,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(grid, file, options)
    }

    /// Write a grid to a string
    pub fn to_string(grid: &Grid, options: &CsvWriteOptions) -> CsvResult<String> {
        let mut csv_writer = Self::builder(options).from_writer(Vec::new());
        Self::write_records(grid, &mut csv_writer)?;
        let bytes = csv_writer.into_inner()?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Write a grid to a writer
    pub fn write<W: Write>(grid: &Grid, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let mut csv_writer = Self::builder(options).from_writer(writer);
        Self::write_records(grid, &mut csv_writer)?;
        csv_writer.flush()?;
        Ok(())
    }

    fn builder(options: &CsvWriteOptions) -> csv::WriterBuilder {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .flexible(false);
        builder
    }

    fn write_records<W: Write>(grid: &Grid, csv_writer: &mut csv::Writer<W>) -> CsvResult<()> {
        for row in 0..grid.rows() {
            let record: Vec<String> = (0..grid.cols())
                .map(|col| grid.display_value(&CellAddress::new(row, col)))
                .collect();
            csv_writer.write_record(&record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use slate_sheets_core::{Cell, CellValue, GridOptions};

    fn small_grid() -> Grid {
        let mut grid = Grid::with_options(&GridOptions { rows: 2, cols: 3 });
        grid.set(CellAddress::new(0, 0), Cell::literal("name"));
        grid.set(CellAddress::new(0, 1), Cell::literal("a, b"));
        grid.set(
            CellAddress::new(1, 2),
            Cell::new("=1+1", Some(CellValue::Number(2.0))),
        );
        grid
    }

    #[test]
    fn test_to_string() {
        let csv = CsvWriter::to_string(&small_grid(), &CsvWriteOptions::default()).unwrap();
        assert_eq!(csv, "name,\"a, b\",\n,,2\n");
    }

    #[test]
    fn test_semicolon_crlf() {
        let options = CsvWriteOptions {
            delimiter: b';',
            line_terminator: LineTerminator::CRLF,
            ..Default::default()
        };
        let csv = CsvWriter::to_string(&small_grid(), &options).unwrap();
        assert_eq!(csv, "name;a, b;\r\n;;2\r\n");
    }

    #[test]
    fn test_cells_outside_bounds_are_not_exported() {
        let mut grid = small_grid();
        grid.set(CellAddress::new(5, 5), Cell::literal("hidden"));
        let csv = CsvWriter::to_string(&grid, &CsvWriteOptions::default()).unwrap();
        assert!(!csv.contains("hidden"));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        CsvWriter::write_file(&small_grid(), &path, &CsvWriteOptions::default()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("name,"));
    }
}
