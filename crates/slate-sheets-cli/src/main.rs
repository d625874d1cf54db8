//! Slate CLI - edit and export a persisted grid from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use slate_sheets::prelude::*;
use slate_sheets::{export_to, parse_formula, Reference};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slate")]
#[command(author, version, about = "Edit and export a small persisted spreadsheet")]
struct Cli {
    /// Directory holding the saved grid
    #[arg(long, global = true, default_value = ".slate")]
    store: PathBuf,

    /// Storage key of the grid
    #[arg(long, global = true, default_value = slate_sheets::DEFAULT_STORAGE_KEY)]
    key: String,

    /// Grid rows used for export
    #[arg(long, global = true, default_value = "20")]
    rows: u32,

    /// Grid columns used for export
    #[arg(long, global = true, default_value = "10")]
    cols: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Commit input to a cell (a leading '=' makes it a formula)
    Set {
        /// Cell address, e.g. B3
        address: String,

        /// Raw input; empty clears the cell
        #[arg(allow_hyphen_values = true)]
        input: String,
    },

    /// Print a cell's raw input and displayed value
    Get {
        /// Cell address, e.g. B3
        address: String,
    },

    /// Print every used cell as a table
    Show {
        /// Also list formulas and the cells they read
        #[arg(short, long)]
        formulas: bool,
    },

    /// Export the grid bounds to stdout or a file
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove every cell
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => ExportFormat::Csv,
            Format::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = ControllerOptions {
        grid: GridOptions {
            rows: cli.rows,
            cols: cli.cols,
        },
        storage_key: cli.key.clone(),
    };
    let mut app = AppContext::open(FileStorage::new(&cli.store), &options)
        .with_context(|| format!("Failed to open grid in '{}'", cli.store.display()))?;

    match cli.command {
        Commands::Set { address, input } => set_cell(&mut app, &address, &input),
        Commands::Get { address } => get_cell(app.controller(), &address),
        Commands::Show { formulas } => show(app.controller(), formulas),
        Commands::Export { format, output } => export(app.controller(), format.into(), output),
        Commands::Clear => {
            app.clear().context("Failed to save cleared grid")?;
            eprintln!("Cleared grid '{}'", cli.key);
            Ok(())
        }
    }
}

fn parse_address(address: &str) -> Result<CellAddress> {
    CellAddress::parse(address).with_context(|| format!("'{}' is not a cell address", address))
}

fn set_cell(app: &mut AppContext<FileStorage>, address: &str, input: &str) -> Result<()> {
    let addr = parse_address(address)?;
    app.commit(addr, input)
        .with_context(|| format!("Failed to save grid after editing {}", addr))?;
    println!("{}", app.controller().display_value(&addr));
    Ok(())
}

fn get_cell(sheet: &GridController<FileStorage>, address: &str) -> Result<()> {
    let addr = parse_address(address)?;
    match sheet.cell(&addr) {
        Some(cell) => {
            println!("raw:     {}", cell.raw());
            println!("display: {}", cell.display_value());
        }
        None => println!("{} is empty", addr),
    }
    Ok(())
}

fn show(sheet: &GridController<FileStorage>, list_formulas: bool) -> Result<()> {
    let grid = sheet.grid();
    let used = match grid.used_bounds() {
        Some(range) => range,
        None => {
            eprintln!("Grid is empty");
            return Ok(());
        }
    };

    let rows: Vec<Vec<String>> = (0..=used.end.row)
        .map(|row| {
            (0..=used.end.col)
                .map(|col| grid.display_value(&CellAddress::new(row, col)))
                .collect()
        })
        .collect();

    let row_label_width = (used.end.row + 1).to_string().len();
    let widths: Vec<usize> = (0..=used.end.col)
        .map(|col| {
            let header = CellAddress::column_to_letters(col).len();
            rows.iter()
                .map(|r| r[col as usize].chars().count())
                .fold(header, usize::max)
        })
        .collect();

    let header: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(col, w)| format!("{:<w$}", CellAddress::column_to_letters(col as u16), w = w))
        .collect();
    println!("{:>rw$} | {}", "", header.join(" | "), rw = row_label_width);

    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, w)| format!("{:<w$}", value, w = w))
            .collect();
        println!("{:>rw$} | {}", i + 1, cells.join(" | "), rw = row_label_width);
    }

    if list_formulas {
        println!();
        for (addr, cell) in grid.sorted_cells() {
            let formula = match cell.formula() {
                Some(f) => f,
                None => continue,
            };
            let reads = match parse_formula(formula) {
                Ok(ast) => ast
                    .references()
                    .iter()
                    .map(Reference::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                Err(e) => format!("unparsable: {}", e),
            };
            println!("{}: {} -> {}  [reads: {}]", addr, formula, cell.display_value(), reads);
        }
    }

    Ok(())
}

fn export(
    sheet: &GridController<FileStorage>,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            export_to(sheet.grid(), format, BufWriter::new(file))
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            eprintln!(
                "Wrote {} rows to '{}'",
                sheet.grid().rows(),
                path.display()
            );
        }
        None => {
            export_to(sheet.grid(), format, io::stdout().lock())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
