//! Formula evaluator
//!
//! Evaluates formula ASTs against the current contents of a [`Grid`].
//! Referenced cells are read as they are stored right now; nothing is
//! recomputed, so a formula that reads another formula sees that formula's
//! last committed result.

use crate::ast::{BinaryOperator, FormulaExpr, Function, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::parser::parse_formula;
use slate_sheets_core::{Cell, CellAddress, CellError, CellRange, CellValue, Grid};

/// Context for formula evaluation
pub struct EvaluationContext<'a> {
    /// Grid for cell lookups
    pub grid: Option<&'a Grid>,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context over a grid
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid: Some(grid) }
    }

    /// Create a context without a grid, where every reference reads as 0
    pub fn simple() -> Self {
        Self { grid: None }
    }

    /// A referenced cell's value coerced to a number
    pub fn cell_number(&self, addr: &CellAddress) -> f64 {
        self.grid.map_or(0.0, |grid| grid.numeric_value(addr))
    }

    /// Sum of every cell in a range, after numeric coercion
    ///
    /// Ranges larger than the number of stored cells are summed from the
    /// stored cells instead of walking every address. Either way the cells
    /// are added in row-major order.
    pub fn range_sum(&self, range: &CellRange) -> f64 {
        let grid = match self.grid {
            Some(grid) => grid,
            None => return 0.0,
        };

        if range.cell_count() <= grid.cell_count() as u64 {
            return range
                .cells()
                .fold(0.0, |total, addr| total + grid.numeric_value(&addr));
        }

        let mut inside: Vec<(&CellAddress, &Cell)> = grid
            .iter()
            .filter(|(addr, _)| range.contains(addr))
            .collect();
        inside.sort_unstable_by_key(|(addr, _)| **addr);
        inside
            .into_iter()
            .fold(0.0, |total, (_, cell)| total + cell.numeric_value())
    }
}

/// Evaluate a formula expression to a number
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext) -> FormulaResult<f64> {
    let value = match expr {
        FormulaExpr::Number(n) => *n,

        FormulaExpr::CellRef(addr) => ctx.cell_number(addr),

        FormulaExpr::RangeRef(range) => {
            return Err(FormulaError::Evaluation(format!(
                "Range {} cannot be used as a single value",
                range
            )))
        }

        FormulaExpr::BinaryOp { op, left, right } => {
            let left = evaluate(left, ctx)?;
            let right = evaluate(right, ctx)?;
            evaluate_binary_op(*op, left, right)?
        }

        FormulaExpr::UnaryOp { op, operand } => {
            let operand = evaluate(operand, ctx)?;
            match op {
                UnaryOperator::Negate => -operand,
            }
        }

        FormulaExpr::Function { function, args } => evaluate_function(*function, args, ctx)?,
    };

    if !value.is_finite() {
        return Err(FormulaError::Evaluation("Result is not a finite number".into()));
    }

    Ok(value)
}

fn evaluate_binary_op(op: BinaryOperator, left: f64, right: f64) -> FormulaResult<f64> {
    Ok(match op {
        BinaryOperator::Add => left + right,
        BinaryOperator::Subtract => left - right,
        BinaryOperator::Multiply => left * right,
        BinaryOperator::Divide => {
            if right == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            left / right
        }
    })
}

fn evaluate_function(
    function: Function,
    args: &[FormulaExpr],
    ctx: &EvaluationContext,
) -> FormulaResult<f64> {
    match function {
        Function::Sum => {
            let mut total = 0.0;
            for arg in args {
                total += match arg {
                    FormulaExpr::RangeRef(range) => ctx.range_sum(range),
                    other => evaluate(other, ctx)?,
                };
            }
            Ok(total)
        }
    }
}

/// Parse and evaluate formula text, never failing
///
/// Parse and evaluation errors become an error marker value.
///
/// ```rust
/// use slate_sheets_core::{CellError, CellValue};
/// use slate_sheets_formula::{evaluate_formula, EvaluationContext};
///
/// let ctx = EvaluationContext::simple();
/// assert_eq!(evaluate_formula("=2*(3+4)", &ctx), CellValue::Number(14.0));
/// assert_eq!(evaluate_formula("=1/0", &ctx), CellValue::Error(CellError::Div0));
/// assert_eq!(evaluate_formula("=1+", &ctx), CellValue::Error(CellError::Error));
/// ```
pub fn evaluate_formula(formula: &str, ctx: &EvaluationContext) -> CellValue {
    let result = parse_formula(formula).and_then(|ast| evaluate(&ast, ctx));

    match result {
        Ok(n) => CellValue::Number(n),
        Err(e) => {
            tracing::debug!("formula {formula:?} failed: {e}");
            CellValue::Error(error_marker(&e))
        }
    }
}

/// The marker shown in a cell for a formula error
pub fn error_marker(error: &FormulaError) -> CellError {
    match error {
        FormulaError::DivisionByZero => CellError::Div0,
        _ => CellError::Error,
    }
}
