//! Formula parser
//!
//! A recursive descent parser over the formula text. Precedence, lowest to
//! highest: comparison (`= <> != < <= > >=`), term (`+ - &`), factor
//! (`* /`), unary minus, terminal. Terminals are tried in a fixed order:
//! function call, parenthesized expression, cell or range reference,
//! boolean, number, string.

use crate::ast::{BinaryOperator, CellReference, FormulaExpr, RangeReference, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use statsbook_core::Address;

/// Parse a formula string into an AST
///
/// The leading `=` is optional, since worksheet parts store formulas
/// without it.
///
/// # Example
/// ```rust
/// use statsbook_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("SUM(A1:A10)").unwrap();
/// let ast = parse_formula("=IF(A1>0,\"Yes\",\"No\")").unwrap();
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let formula = formula.trim();
    let formula = formula.strip_prefix('=').unwrap_or(formula);

    let mut parser = FormulaParser::new(formula);
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    parser.skip_whitespace();
    if !parser.is_at_end() {
        return Err(FormulaError::TrailingInput(parser.rest().to_string()));
    }

    Ok(expr)
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    // === Helper methods ===

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, char::is_whitespace) {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Consume `token` (after whitespace) if it is next
    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds, returning them
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek_char().map_or(false, &pred) {
            self.advance();
        }
        &self.input[start..self.pos]
    }

    /// A short excerpt of the remaining input for error messages
    fn context(&self, from: usize) -> String {
        self.input[from..].chars().take(16).collect()
    }

    // === Expression parsing with precedence ===

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_term()?;

        loop {
            let op = if self.eat("=") {
                BinaryOperator::Equal
            } else if self.eat("!=") || self.eat("<>") {
                BinaryOperator::NotEqual
            } else if self.eat(">=") {
                BinaryOperator::GreaterEqual
            } else if self.eat("<=") {
                BinaryOperator::LessEqual
            } else if self.eat(">") {
                BinaryOperator::GreaterThan
            } else if self.eat("<") {
                BinaryOperator::LessThan
            } else {
                break;
            };
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_factor()?;

        loop {
            let op = if self.eat("+") {
                BinaryOperator::Add
            } else if self.eat("-") {
                BinaryOperator::Subtract
            } else if self.eat("&") {
                BinaryOperator::Concat
            } else {
                break;
            };
            let right = self.parse_factor()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = if self.eat("*") {
                BinaryOperator::Multiply
            } else if self.eat("/") {
                BinaryOperator::Divide
            } else {
                break;
            };
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<FormulaExpr> {
        if self.eat("-") {
            let operand = self.parse_unary()?;
            return Ok(FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            });
        }
        // unary plus is a no-op
        if self.eat("+") {
            return self.parse_unary();
        }
        self.parse_terminal()
    }

    fn parse_terminal(&mut self) -> FormulaResult<FormulaExpr> {
        self.skip_whitespace();
        let start = self.pos;

        if let Some(function) = self.parse_function_call()? {
            return Ok(function);
        }

        if self.eat("(") {
            let expr = self.parse_expression()?;
            if !self.eat(")") {
                return Err(FormulaError::MissingClosingParen);
            }
            return Ok(expr);
        }

        if let Some((sheet, address)) = self.parse_reference()? {
            return self.parse_range_tail(sheet, address);
        }

        if let Some(value) = self.parse_boolean() {
            return Ok(FormulaExpr::Boolean(value));
        }

        if let Some(n) = self.parse_number() {
            return Ok(FormulaExpr::Number(n));
        }

        if self.peek_char() == Some('"') {
            return self.parse_string().map(FormulaExpr::String);
        }

        if self.is_at_end() {
            Err(FormulaError::UnrecognizedTerminal("end of formula".into()))
        } else {
            Err(FormulaError::UnrecognizedTerminal(self.context(start)))
        }
    }

    /// `NAME(arg, ...)`; the `(` must follow the name directly
    fn parse_function_call(&mut self) -> FormulaResult<Option<FormulaExpr>> {
        let start = self.pos;
        let first = self.peek_char();
        if !first.map_or(false, |c| c.is_ascii_uppercase() || c == '_') {
            return Ok(None);
        }
        let name = self
            .take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '.');
        if self.peek_char() != Some('(') {
            self.pos = start;
            return Ok(None);
        }
        self.advance();

        let name = name.to_string();
        let mut args = Vec::new();

        if self.eat(")") {
            return Ok(Some(FormulaExpr::Function { name, args }));
        }

        loop {
            args.push(self.parse_expression()?);
            if self.eat(")") {
                return Ok(Some(FormulaExpr::Function { name, args }));
            }
            if !self.eat(",") {
                self.skip_whitespace();
                if self.is_at_end() {
                    return Err(FormulaError::MissingClosingParen);
                }
                return Err(FormulaError::ExpectedComma(name));
            }
        }
    }

    /// An optional `Sheet!` or `'Sheet name'!` qualifier followed by an
    /// optionally anchored cell address
    ///
    /// Returns `Ok(None)` (with nothing consumed) if the input does not
    /// start with a reference.
    fn parse_reference(&mut self) -> FormulaResult<Option<(Option<String>, Address)>> {
        self.skip_whitespace();
        let start = self.pos;

        let sheet = if self.peek_char() == Some('\'') {
            self.advance();
            let mut name = String::new();
            loop {
                match self.peek_char() {
                    None => return Err(FormulaError::MalformedAddress(self.context(start))),
                    Some('\'') => {
                        self.advance();
                        if self.peek_char() == Some('\'') {
                            name.push('\'');
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    Some(c) => {
                        name.push(c);
                        self.advance();
                    }
                }
            }
            if self.peek_char() != Some('!') {
                return Err(FormulaError::MalformedAddress(self.context(start)));
            }
            self.advance();
            Some(name)
        } else {
            let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
            let starts_like_name = name
                .chars()
                .next()
                .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
            // `A1!=B1` is a comparison, not a sheet named A1
            if starts_like_name && self.rest().starts_with('!') && !self.rest().starts_with("!=")
            {
                self.advance();
                Some(name.to_string())
            } else {
                self.pos = start;
                None
            }
        };

        let address_start = self.pos;
        let col_anchor = self.peek_char() == Some('$');
        if col_anchor {
            self.advance();
        }
        let letters = self.take_while(|c| c.is_ascii_uppercase());
        let row_anchor = self.peek_char() == Some('$');
        if row_anchor {
            self.advance();
        }
        let digits = self.take_while(|c| c.is_ascii_digit());

        if letters.is_empty() || digits.is_empty() {
            if sheet.is_some() || col_anchor || row_anchor {
                return Err(FormulaError::MalformedAddress(self.context(start)));
            }
            // not a reference after all (e.g. TRUE)
            self.pos = start;
            return Ok(None);
        }

        let text = &self.input[address_start..self.pos];
        match Address::parse(text) {
            Some(address) => Ok(Some((sheet, address))),
            None => Err(FormulaError::MalformedAddress(self.context(start))),
        }
    }

    /// After a reference: `:` and a second reference make a range
    fn parse_range_tail(
        &mut self,
        sheet: Option<String>,
        address: Address,
    ) -> FormulaResult<FormulaExpr> {
        let colon = self.pos;
        if !self.eat(":") {
            return Ok(FormulaExpr::CellRef(CellReference { sheet, address }));
        }

        let Some((end_sheet, end)) = self.parse_reference()? else {
            return Err(FormulaError::MalformedRange(self.context(colon)));
        };

        let sheet = match (sheet, end_sheet) {
            (None, None) => None,
            (Some(s), None) | (None, Some(s)) => Some(s),
            (Some(a), Some(b)) if a == b => Some(a),
            (Some(a), Some(b)) => {
                return Err(FormulaError::MalformedRange(format!("{}!..:{}!..", a, b)));
            }
        };

        Ok(FormulaExpr::RangeRef(RangeReference {
            sheet,
            start: address,
            end,
        }))
    }

    /// Bare `TRUE` / `FALSE`
    fn parse_boolean(&mut self) -> Option<bool> {
        let start = self.pos;
        let word = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        let value = match word {
            "TRUE" => Some(true),
            "FALSE" => Some(false),
            _ => None,
        };
        if value.is_none() {
            self.pos = start;
        }
        value
    }

    /// Digits with an optional fraction and exponent
    fn parse_number(&mut self) -> Option<f64> {
        let start = self.pos;
        let int_part = self.take_while(|c| c.is_ascii_digit());
        let mut frac_part = "";
        if self.peek_char() == Some('.') {
            self.advance();
            frac_part = self.take_while(|c| c.is_ascii_digit());
        }
        if int_part.is_empty() && frac_part.is_empty() {
            self.pos = start;
            return None;
        }

        let mantissa_end = self.pos;
        if matches!(self.peek_char(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.advance();
            }
            if self.take_while(|c| c.is_ascii_digit()).is_empty() {
                // "2E" is not an exponent; leave it for the caller
                self.pos = mantissa_end;
            }
        }

        match self.input[start..self.pos].parse() {
            Ok(n) => Some(n),
            Err(_) => {
                self.pos = start;
                None
            }
        }
    }

    /// A double-quoted string; `""` inside the literal is a quote
    fn parse_string(&mut self) -> FormulaResult<String> {
        // opening quote
        self.advance();
        let mut value = String::new();
        loop {
            match self.peek_char() {
                None => return Err(FormulaError::UnterminatedString),
                Some('"') => {
                    self.advance();
                    if self.peek_char() == Some('"') {
                        value.push('"');
                        self.advance();
                    } else {
                        return Ok(value);
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }
}

fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> FormulaExpr {
    FormulaExpr::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
