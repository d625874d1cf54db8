//! # slate-sheets-formula
//!
//! Formula parser and evaluator for slate-sheets.
//!
//! This crate provides:
//! - Tokenizing and parsing formula text into an AST
//! - Evaluation of the AST against a [`Grid`](slate_sheets_core::Grid)
//! - The `SUM` function over ranges and values
//!
//! Only numeric literals, cell references, `+ - * /`, parentheses and `SUM`
//! are understood. Anything else is rejected at parse time.
//!
//! ## Example
//!
//! ```rust
//! use slate_sheets_core::{Cell, CellAddress, CellValue, Grid};
//! use slate_sheets_formula::{evaluate, evaluate_formula, parse_formula, EvaluationContext};
//!
//! let mut grid = Grid::new();
//! grid.set(CellAddress::parse("A1").unwrap(), Cell::literal("5"));
//! grid.set(CellAddress::parse("A2").unwrap(), Cell::literal("10"));
//!
//! let ctx = EvaluationContext::new(&grid);
//! let ast = parse_formula("=SUM(A1:A2)").unwrap();
//! assert_eq!(evaluate(&ast, &ctx).unwrap(), 15.0);
//!
//! assert_eq!(evaluate_formula("=A1*2", &ctx), CellValue::Number(10.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, Function, Reference, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{error_marker, evaluate, evaluate_formula, EvaluationContext};
pub use parser::parse_formula;
