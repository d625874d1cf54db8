//! Computed cell values

use std::fmt;

/// The value a formula evaluates to
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Numeric result
    Number(f64),

    /// Text result
    Text(String),

    /// Error marker (#ERROR, #DIV/0!)
    Error(CellError),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the value is an error marker
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Get the value as a number, if it is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric coercion used by formulas: text that parses as a number is
    /// used as-is, everything else (other text, errors) becomes 0.
    pub fn to_number_lenient(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => coerce_number(s),
            CellValue::Error(_) => 0.0,
        }
    }

    /// Render the value the way a grid displays it
    pub fn display(&self) -> String {
        match self {
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Error(e) => e.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Error markers displayed in place of a formula result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// The formula could not be parsed or evaluated
    Error,
    /// Division by zero
    Div0,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Error => "#ERROR",
            CellError::Div0 => "#DIV/0!",
        }
    }

    /// Parse an error marker from its display string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "#ERROR" => Some(CellError::Error),
            "#DIV/0!" => Some(CellError::Div0),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coerce arbitrary cell text to a number; non-numeric text is 0.
///
/// Only finite decimal numbers count, so "inf" and "NaN" coerce to 0 as well.
pub fn coerce_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Format a number for display: integers without a trailing ".0"
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("5"), 5.0);
        assert_eq!(coerce_number(" 2.5 "), 2.5);
        assert_eq!(coerce_number("-3"), -3.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number("12abc"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("#ERROR"), 0.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(15.0), "15");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_error_markers() {
        assert_eq!(CellError::Error.to_string(), "#ERROR");
        assert_eq!(CellError::Div0.to_string(), "#DIV/0!");
        assert_eq!(CellError::from_str("#DIV/0!"), Some(CellError::Div0));
        assert_eq!(CellError::from_str("#N/A"), None);
    }

    #[test]
    fn test_lenient_number() {
        assert_eq!(CellValue::Number(4.0).to_number_lenient(), 4.0);
        assert_eq!(CellValue::text("7").to_number_lenient(), 7.0);
        assert_eq!(CellValue::text("seven").to_number_lenient(), 0.0);
        assert_eq!(CellValue::Error(CellError::Div0).to_number_lenient(), 0.0);
    }
}
