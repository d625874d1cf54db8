//! Formula Abstract Syntax Tree types

use std::fmt;

use slate_sheets_core::{CellAddress, CellRange};

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// Numeric literal
    Number(f64),

    /// Single cell reference
    CellRef(CellAddress),
    /// Range reference; only valid as a function argument
    RangeRef(CellRange),

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },

    /// Function call
    Function {
        function: Function,
        args: Vec<FormulaExpr>,
    },
}

impl FormulaExpr {
    /// Every cell and range the expression reads, in source order
    pub fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references(&self, refs: &mut Vec<Reference>) {
        match self {
            FormulaExpr::Number(_) => {}
            FormulaExpr::CellRef(addr) => refs.push(Reference::Cell(*addr)),
            FormulaExpr::RangeRef(range) => refs.push(Reference::Range(*range)),
            FormulaExpr::BinaryOp { left, right, .. } => {
                left.collect_references(refs);
                right.collect_references(refs);
            }
            FormulaExpr::UnaryOp { operand, .. } => operand.collect_references(refs),
            FormulaExpr::Function { args, .. } => {
                for arg in args {
                    arg.collect_references(refs);
                }
            }
        }
    }
}

/// A cell or range read by a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Cell(CellAddress),
    Range(CellRange),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Cell(addr) => write!(f, "{}", addr),
            Reference::Range(range) => write!(f, "{}", range),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}

/// Built-in functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Sum of every argument; ranges contribute each of their cells
    Sum,
}

impl Function {
    /// Look up a function by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SUM" => Some(Function::Sum),
            _ => None,
        }
    }

    /// Canonical upper-case name
    pub fn name(&self) -> &'static str {
        match self {
            Function::Sum => "SUM",
        }
    }
}
