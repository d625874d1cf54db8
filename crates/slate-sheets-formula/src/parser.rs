//! Formula parser
//!
//! The input is first split into an explicit token stream, then parsed by a
//! recursive descent parser with standard arithmetic precedence.

use crate::ast::{BinaryOperator, FormulaExpr, Function, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use slate_sheets_core::{CellAddress, CellRange};

/// Parse a formula string into an AST
///
/// # Example
/// ```rust
/// use slate_sheets_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("=SUM(A1:A10)").unwrap();
/// let ast = parse_formula("=(A1+B1)*2").unwrap();
///
/// assert!(parse_formula("=A1:A2)").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let body = formula
        .strip_prefix('=')
        .ok_or_else(|| FormulaError::Parse("Formula must start with '='".into()))?;

    let tokens = tokenize(body)?;
    let mut parser = FormulaParser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_expression()?;

    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Parse(format!(
            "Unexpected {:?} after expression",
            parser.current_token()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    CellRef(CellAddress),
    Identifier(String),

    Plus,
    Minus,
    Star,
    Slash,
    Colon,
    Comma,
    LeftParen,
    RightParen,

    Eof,
}

/// Split a formula body (without the leading '=') into tokens
pub(crate) fn tokenize(input: &str) -> FormulaResult<Vec<Token>> {
    let mut scanner = Scanner { input, pos: 0 };
    let mut tokens = Vec::new();

    loop {
        let token = scanner.scan_token()?;
        let done = token == Token::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() || c == '_' {
            return self.scan_identifier_or_ref();
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at position {}",
            c, self.pos
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        self.skip_digits();
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent only when digits follow, so "2E" is not swallowed
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let digit_at = match self.peek_char_at(1) {
                Some('+') | Some('-') => 2,
                _ => 1,
            };
            if self.peek_char_at(digit_at).map_or(false, |c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.advance();
                }
                self.skip_digits();
            }
        }

        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", text)))
    }

    fn scan_identifier_or_ref(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let text = &self.input[start..self.pos];

        // LOG10( style names are functions even though they look like references
        let followed_by_paren = {
            let rest = self.input[self.pos..].trim_start();
            rest.starts_with('(')
        };

        if is_cell_reference(text) && !followed_by_paren {
            let address = CellAddress::parse(text).map_err(|e| {
                FormulaError::InvalidReference(format!("'{}': {}", text, e))
            })?;
            return Ok(Token::CellRef(address));
        }

        Ok(Token::Identifier(text.to_string()))
    }

    fn skip_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }
}

/// Letters followed by digits, nothing else
fn is_cell_reference(text: &str) -> bool {
    let letters = text.bytes().take_while(|b| b.is_ascii_alphabetic()).count();
    letters > 0
        && letters < text.len()
        && text.bytes().skip(letters).all(|b| b.is_ascii_digit())
}

/// Deepest nesting of parentheses, unary signs and function calls
const MAX_NESTING: usize = 256;

/// Formula parser over a token stream
struct FormulaParser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl FormulaParser {
    fn current_token(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn consume(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume();
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: -, +
    // 4. Primary: numbers, references, function calls, parentheses

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume();
            let right = self.parse_multiplicative()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume();
            let right = self.parse_unary()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    // All nesting recurses through here
    fn parse_unary(&mut self) -> FormulaResult<FormulaExpr> {
        if self.depth >= MAX_NESTING {
            return Err(FormulaError::Parse("Formula nested too deeply".into()));
        }
        self.depth += 1;
        let expr = self.parse_signed();
        self.depth -= 1;
        expr
    }

    fn parse_signed(&mut self) -> FormulaResult<FormulaExpr> {
        match self.current_token() {
            Token::Minus => {
                self.consume();
                let operand = self.parse_unary()?;
                Ok(FormulaExpr::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(operand),
                })
            }
            Token::Plus => {
                self.consume();
                self.parse_unary()
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> FormulaResult<FormulaExpr> {
        match self.consume() {
            Token::Number(n) => Ok(FormulaExpr::Number(n)),

            Token::CellRef(address) => {
                if matches!(self.current_token(), Token::Colon) {
                    return Err(FormulaError::Parse(format!(
                        "Range starting at {} is only allowed as a function argument",
                        address
                    )));
                }
                Ok(FormulaExpr::CellRef(address))
            }

            Token::LeftParen => {
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }

            Token::Identifier(name) => {
                if matches!(self.current_token(), Token::LeftParen) {
                    self.parse_function_call(&name)
                } else {
                    Err(FormulaError::Parse(format!("Unknown identifier '{}'", name)))
                }
            }

            other => Err(FormulaError::Parse(format!("Unexpected token: {:?}", other))),
        }
    }

    fn parse_function_call(&mut self, name: &str) -> FormulaResult<FormulaExpr> {
        let function = Function::from_name(name)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_ascii_uppercase()))?;

        self.expect(&Token::LeftParen)?;

        let mut args = Vec::new();
        if !matches!(self.current_token(), Token::RightParen) {
            args.push(self.parse_argument()?);

            while matches!(self.current_token(), Token::Comma) {
                self.consume();
                args.push(self.parse_argument()?);
            }
        }

        self.expect(&Token::RightParen)?;

        Ok(FormulaExpr::Function { function, args })
    }

    /// A function argument: a range (`A1:B5`) or any expression
    fn parse_argument(&mut self) -> FormulaResult<FormulaExpr> {
        if let Token::CellRef(start) = *self.current_token() {
            if matches!(self.tokens.get(self.pos + 1), Some(Token::Colon)) {
                self.pos += 2;
                return match self.consume() {
                    Token::CellRef(end) => {
                        Ok(FormulaExpr::RangeRef(CellRange::new(start, end)))
                    }
                    other => Err(FormulaError::Parse(format!(
                        "Expected cell reference after ':', got {:?}",
                        other
                    ))),
                };
            }
        }

        self.parse_expression()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("SUM(A1:B2) + 3.5").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Identifier("SUM".into()),
                Token::LeftParen,
                Token::CellRef(addr("A1")),
                Token::Colon,
                Token::CellRef(addr("B2")),
                Token::RightParen,
                Token::Plus,
                Token::Number(3.5),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_rejects_unknown_characters() {
        assert!(tokenize("1 ^ 2").is_err());
        assert!(tokenize("alert(\"x\")").is_err());
        assert!(tokenize("A1 & B1").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_formula("=42").unwrap(), FormulaExpr::Number(42.0));
        assert_eq!(parse_formula("=3.25").unwrap(), FormulaExpr::Number(3.25));
        assert_eq!(parse_formula("=.5").unwrap(), FormulaExpr::Number(0.5));
        assert_eq!(parse_formula("=1e3").unwrap(), FormulaExpr::Number(1000.0));
    }

    #[test]
    fn test_parse_precedence() {
        let ast = parse_formula("=1+2*3").unwrap();
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Add);
            assert_eq!(*left, FormulaExpr::Number(1.0));
            assert!(matches!(
                *right,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_left_associative() {
        // (8-3)-2, not 8-(3-2)
        let ast = parse_formula("=8-3-2").unwrap();
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Subtract);
            assert!(matches!(*left, FormulaExpr::BinaryOp { .. }));
            assert_eq!(*right, FormulaExpr::Number(2.0));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = parse_formula("=(1+2)*3").unwrap();
        if let FormulaExpr::BinaryOp { op, left, .. } = ast {
            assert_eq!(op, BinaryOperator::Multiply);
            assert!(matches!(
                *left,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Add,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_unary() {
        let ast = parse_formula("=-A1").unwrap();
        assert_eq!(
            ast,
            FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(FormulaExpr::CellRef(addr("A1"))),
            }
        );
        assert_eq!(parse_formula("=+4").unwrap(), FormulaExpr::Number(4.0));
    }

    #[test]
    fn test_parse_sum() {
        let ast = parse_formula("=SUM(A1:A10)").unwrap();
        assert_eq!(
            ast,
            FormulaExpr::Function {
                function: Function::Sum,
                args: vec![FormulaExpr::RangeRef(CellRange::parse("A1:A10").unwrap())],
            }
        );

        let ast = parse_formula("=sum(A1, 2, B1:B2)").unwrap();
        if let FormulaExpr::Function { args, .. } = ast {
            assert_eq!(args.len(), 3);
        } else {
            panic!("Expected Function");
        }
    }

    #[test]
    fn test_parse_lowercase_reference() {
        assert_eq!(
            parse_formula("=b2").unwrap(),
            FormulaExpr::CellRef(addr("B2"))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_formula("A1+1").is_err());
        assert!(parse_formula("=").is_err());
        assert!(parse_formula("=A1:A2)").is_err());
        assert!(parse_formula("=A1:A2").is_err());
        assert!(parse_formula("=(1+2").is_err());
        assert!(parse_formula("=1+").is_err());
        assert!(parse_formula("=1 2").is_err());
        assert!(parse_formula("=SUM(A1:)").is_err());
        assert!(parse_formula("=foo").is_err());
        assert!(parse_formula("=A0").is_err());
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let signs = format!("={}1", "-".repeat(100_000));
        assert_eq!(
            parse_formula(&signs),
            Err(FormulaError::Parse("Formula nested too deeply".into()))
        );

        let parens = format!("={}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(
            parse_formula(&parens),
            Err(FormulaError::Parse("Formula nested too deeply".into()))
        );

        let calls = format!("={}1{}", "SUM(".repeat(10_000), ")".repeat(10_000));
        assert!(parse_formula(&calls).is_err());
    }

    #[test]
    fn test_moderate_nesting_parses() {
        let formula = format!("={}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse_formula(&formula).unwrap(), FormulaExpr::Number(1.0));
        assert!(parse_formula(&format!("={}1", "-".repeat(200))).is_ok());
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            parse_formula("=AVERAGE(A1:A3)"),
            Err(FormulaError::UnknownFunction("AVERAGE".into()))
        );
    }
}
