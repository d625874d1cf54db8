//! The committed cell record

use super::value::{coerce_number, CellValue};

/// A committed cell
///
/// A cell has a formula if and only if its raw input starts with `=`.
/// The computed value is only kept for formula cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    raw: String,
    formula: Option<String>,
    computed: Option<CellValue>,
}

impl Cell {
    /// Create a cell from raw input and an optional computed value
    ///
    /// The computed value is dropped when `raw` is not a formula.
    pub fn new<S: Into<String>>(raw: S, computed: Option<CellValue>) -> Self {
        let raw = raw.into();
        if Self::is_formula_input(&raw) {
            Self {
                formula: Some(raw.clone()),
                raw,
                computed,
            }
        } else {
            Self {
                raw,
                formula: None,
                computed: None,
            }
        }
    }

    /// Create a literal cell
    pub fn literal<S: Into<String>>(raw: S) -> Self {
        Self::new(raw, None)
    }

    /// Whether raw input is classified as a formula
    pub fn is_formula_input(raw: &str) -> bool {
        raw.starts_with('=')
    }

    /// The raw input exactly as committed
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The formula text, for formula cells
    pub fn formula(&self) -> Option<&str> {
        self.formula.as_deref()
    }

    /// The cached result of the last evaluation, for formula cells
    pub fn computed(&self) -> Option<&CellValue> {
        self.computed.as_ref()
    }

    /// Check if this is a formula cell
    pub fn is_formula(&self) -> bool {
        self.formula.is_some()
    }

    /// The value shown in the grid
    pub fn display_value(&self) -> String {
        match (&self.formula, &self.computed) {
            (Some(_), Some(value)) => value.display(),
            (Some(_), None) => String::new(),
            (None, _) => self.raw.clone(),
        }
    }

    /// The value formulas see when they reference this cell
    pub fn numeric_value(&self) -> f64 {
        match (&self.formula, &self.computed) {
            (Some(_), Some(value)) => value.to_number_lenient(),
            (Some(_), None) => 0.0,
            (None, _) => coerce_number(&self.raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellError;

    #[test]
    fn test_literal_cell() {
        let cell = Cell::literal("hello");
        assert_eq!(cell.raw(), "hello");
        assert!(!cell.is_formula());
        assert_eq!(cell.display_value(), "hello");
        assert_eq!(cell.numeric_value(), 0.0);
    }

    #[test]
    fn test_formula_cell() {
        let cell = Cell::new("=1+2", Some(CellValue::Number(3.0)));
        assert_eq!(cell.formula(), Some("=1+2"));
        assert_eq!(cell.display_value(), "3");
        assert_eq!(cell.numeric_value(), 3.0);
    }

    #[test]
    fn test_literal_drops_computed_value() {
        let cell = Cell::new("42", Some(CellValue::Number(1.0)));
        assert!(cell.computed().is_none());
        assert_eq!(cell.numeric_value(), 42.0);
    }

    #[test]
    fn test_error_formula_coerces_to_zero() {
        let cell = Cell::new("=1/0", Some(CellValue::Error(CellError::Div0)));
        assert_eq!(cell.display_value(), "#DIV/0!");
        assert_eq!(cell.numeric_value(), 0.0);
    }
}
