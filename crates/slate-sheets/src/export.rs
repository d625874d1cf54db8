//! Grid export
//!
//! Both formats walk rows 1..=N and columns 1..=M of the grid bounds and
//! emit each cell's displayed value.

use std::io::Write;

use slate_sheets_core::{CellAddress, Grid};
use slate_sheets_csv::{CsvWriteOptions, CsvWriter};

use crate::error::ExportError;

/// Export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Displayed values of the grid, one `Vec` per row
pub fn display_rows(grid: &Grid) -> Vec<Vec<String>> {
    (0..grid.rows())
        .map(|row| {
            (0..grid.cols())
                .map(|col| grid.display_value(&CellAddress::new(row, col)))
                .collect()
        })
        .collect()
}

/// Export the grid as a JSON array of rows
pub fn to_json(grid: &Grid) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&display_rows(grid))?)
}

/// Export the grid in the given format
pub fn export(grid: &Grid, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => Ok(CsvWriter::to_string(grid, &CsvWriteOptions::default())?),
        ExportFormat::Json => to_json(grid),
    }
}

/// Export the grid to a writer
pub fn export_to<W: Write>(
    grid: &Grid,
    format: ExportFormat,
    mut writer: W,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => CsvWriter::write(grid, writer, &CsvWriteOptions::default())?,
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &display_rows(grid))?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
